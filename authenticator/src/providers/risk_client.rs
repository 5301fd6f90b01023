//! HTTP client for the risk scorer's `/predict`.

use crate::error::{AuthenticatorError, Result};

use super::{PredictRequest, PredictResponse};

/// Abstracts over the call to the risk scorer.
pub trait RiskScorerClient: Send + Sync {
    /// Score a login attempt.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UpstreamUnavailable` if the call fails
    /// or the risk scorer returns a non-success status, and
    /// `AuthenticatorError::UpstreamEventMismatch` if the response's
    /// `event_id` does not match the request's.
    async fn predict(&self, request: PredictRequest) -> Result<PredictResponse>;
}

/// `reqwest`-backed `RiskScorerClient`, bounded by the inter-service
/// timeout (§5).
#[derive(Clone)]
pub struct HttpRiskScorerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRiskScorerClient {
    /// Point at the risk scorer's base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(crate::constants::durations::UPSTREAM_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

impl RiskScorerClient for HttpRiskScorerClient {
    async fn predict(&self, request: PredictRequest) -> Result<PredictResponse> {
        let event_id = request.event_id;
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(AuthenticatorError::UpstreamUnavailable);
        }

        let body: PredictResponse =
            response.json().await.map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if body.data.event_id != event_id {
            return Err(AuthenticatorError::UpstreamEventMismatch);
        }

        Ok(body)
    }
}
