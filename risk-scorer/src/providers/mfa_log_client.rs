//! HTTP client for the MFA arbiter's `GET /otp-logs/{event_id}`, used to
//! verify whether a past successful attempt actually completed an MFA
//! challenge (§4.2).

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Result, RiskScorerError};

/// Counts of OTP log rows for one event, enough to classify an attempt as
/// verified or not.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OtpLogSummary {
    /// Number of `sent` rows logged for this event.
    pub sent_logs_count: u32,
    /// Number of `verified` rows logged for this event.
    pub verified_logs_count: u32,
}

/// Abstracts over the call to the MFA arbiter's OTP log endpoint.
pub trait MfaLogClient: Send + Sync {
    /// Fetch the OTP log summary for an event. `None` means no challenge
    /// was ever issued for it (204).
    ///
    /// # Errors
    ///
    /// Returns `RiskScorerError::UpstreamUnavailable` on transport failure
    /// or an unexpected status.
    async fn otp_logs(&self, event_id: Uuid) -> Result<Option<OtpLogSummary>>;
}

/// `reqwest`-backed `MfaLogClient`.
#[derive(Clone)]
pub struct HttpMfaLogClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMfaLogClient {
    /// Point at the MFA arbiter's base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(crate::constants::UPSTREAM_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

impl MfaLogClient for HttpMfaLogClient {
    async fn otp_logs(&self, event_id: Uuid) -> Result<Option<OtpLogSummary>> {
        let response = self
            .client
            .get(format!("{}/otp-logs/{event_id}", self.base_url))
            .send()
            .await
            .map_err(|_| RiskScorerError::UpstreamUnavailable)?;

        match response.status().as_u16() {
            204 => Ok(None),
            200 => response.json().await.map(Some).map_err(|_| RiskScorerError::UpstreamUnavailable),
            _ => Err(RiskScorerError::UpstreamUnavailable),
        }
    }
}
