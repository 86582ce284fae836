//! Error taxonomy shared by the store, the orchestrator, and the service clients.

use thiserror::Error;

use crate::placement::PlacementId;

/// Failures reported by the crate's public operations.
///
/// `Validation` and `NotFound` are contract violations and fail the single
/// operation that raised them. `Service` is only returned by whole-operation
/// requests (placement generation); per-placement simulation failures are
/// captured into the placement's result instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("placement {0} not found")]
    NotFound(PlacementId),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("{} of {attempted} simulations failed", failed.len())]
    PartialFailure {
        /// Placements whose simulation failed, with the surfaced message.
        failed: Vec<(PlacementId, String)>,
        /// Number of service calls made during the run.
        attempted: usize,
    },
}

/// Failure talking to one of the external HTTP collaborators.
///
/// The `Display` text is what ends up in a placement's failure result and in
/// user notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("client build failed: {message}")]
    ClientBuild { message: String },
    #[error("http request failed: {message}")]
    Transport { message: String },
    #[error("http status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("decode response failed: {message}")]
    Decode { message: String },
    #[error("malformed response: {message}")]
    Malformed { message: String },
    #[error("request rejected: {message}")]
    Rejected { message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_counts_failed_entries() {
        let err = Error::PartialFailure {
            failed: vec![(PlacementId::new(3), "http status 500: boom".to_string())],
            attempted: 4,
        };
        assert_eq!(err.to_string(), "1 of 4 simulations failed");
    }

    #[test]
    fn service_error_converts_into_error() {
        let err: Error = ServiceError::Rejected {
            message: "box too small".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Service(ServiceError::Rejected { .. })));
        assert_eq!(
            err.to_string(),
            "service error: request rejected: box too small"
        );
    }
}
