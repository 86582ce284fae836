//! Read-only REST API over the results of a finished run.
//!
//! Provides four GET endpoints:
//! - `/placements`: every placement with its status and summary
//! - `/summary`: aggregate energy and revenue
//! - `/placements/{id}/series`: one placement's hourly series
//! - `/comparison`: all successful series

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::placement::Placement;
use crate::sim::aggregate::ResultAggregator;

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; all data is
/// read-only, so no locks are needed.
pub struct AppState {
    /// Placements with their results, in store order.
    pub placements: Vec<Placement>,
    pub aggregator: ResultAggregator,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Results of the finished run, shared by every handler
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/placements", get(handlers::list_placements))
        .route("/placements/{id}/series", get(handlers::get_series))
        .route("/summary", get(handlers::get_summary))
        .route("/comparison", get(handlers::get_comparison))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Arguments
///
/// * `state` - Results of the finished run
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
