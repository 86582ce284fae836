//! Blocking `reqwest` client for the yield and placement-generation services.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::wire::{
    ErrorBody, GenerationRequestBody, GenerationResponseBody, YieldRequestBody, YieldResponseBody,
};
use super::{PlacementGenerator, YieldReport, YieldRequest, YieldService};
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::geo::{GeoBox, GeoPoint};

/// JSON-over-HTTP client for both external services.
///
/// Calls block the current thread until the response settles or the
/// configured timeout elapses.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    yield_url: String,
    generation_url: String,
    client: Client,
}

impl HttpServiceClient {
    /// # Errors
    ///
    /// Returns [`ServiceError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .build()
            .map_err(|err| ServiceError::ClientBuild {
                message: err.to_string(),
            })?;

        Ok(Self {
            yield_url: config.yield_url.clone(),
            generation_url: config.generation_url.clone(),
            client,
        })
    }

    fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| ServiceError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        let text = response.text().map_err(|err| ServiceError::Transport {
            message: err.to_string(),
        })?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                code: status.as_u16(),
                message: ErrorBody::message_from(&text),
            });
        }

        serde_json::from_str(&text).map_err(|err| ServiceError::Decode {
            message: err.to_string(),
        })
    }
}

impl YieldService for HttpServiceClient {
    fn simulate(&self, request: &YieldRequest) -> Result<YieldReport, ServiceError> {
        let body: YieldResponseBody =
            self.post_json(&self.yield_url, &YieldRequestBody::from(request))?;
        body.into_report()
    }
}

impl PlacementGenerator for HttpServiceClient {
    fn generate(&self, area: &GeoBox, count: u32) -> Result<Vec<GeoPoint>, ServiceError> {
        let body: GenerationResponseBody = self.post_json(
            &self.generation_url,
            &GenerationRequestBody::new(area, count),
        )?;
        body.into_points()
    }
}
