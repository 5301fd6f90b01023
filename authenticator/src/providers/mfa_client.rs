//! HTTP client for the MFA arbiter's `/check`, `/verify`, and cascade-delete
//! endpoints.

use crate::error::{AuthenticatorError, Result};
use crate::state::UserId;

use super::{CheckRequest, CheckResponse, VerifyRequest, VerifyResponse};

/// Abstracts over the calls to the MFA arbiter.
pub trait MfaArbiterClient: Send + Sync {
    /// Ask whether a challenge is required for this login.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UpstreamUnavailable` on transport
    /// failure or an unexpected status, and
    /// `AuthenticatorError::UpstreamEventMismatch` on a correlation
    /// mismatch.
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse>;

    /// Submit a one-time code for verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::NoPendingChallenge`,
    /// `AuthenticatorError::OtpInvalid`, `AuthenticatorError::DeviceMismatch`,
    /// or `AuthenticatorError::UpstreamEventMismatch` for domain rejections
    /// (mapped from the arbiter's 404/401 responses, disambiguated by the
    /// response body's error code), and `AuthenticatorError::
    /// UpstreamUnavailable` for anything else.
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse>;

    /// Cascade-delete a user's trusted devices ahead of account deletion.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UpstreamUnavailable` on failure.
    async fn delete_trusted_devices(&self, user_id: UserId) -> Result<u64>;

    /// Cascade-delete a user's OTP logs ahead of account deletion.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UpstreamUnavailable` on failure.
    async fn delete_otp_logs(&self, email: &str) -> Result<u64>;
}

/// `reqwest`-backed `MfaArbiterClient`.
#[derive(Clone)]
pub struct HttpMfaArbiterClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMfaArbiterClient {
    /// Point at the MFA arbiter's base URL.
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

impl MfaArbiterClient for HttpMfaArbiterClient {
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse> {
        let event_id = request.event_id;
        let response = self
            .client
            .post(format!("{}/check", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if !matches!(response.status().as_u16(), 200 | 202) {
            return Err(AuthenticatorError::UpstreamUnavailable);
        }

        let body: CheckResponse =
            response.json().await.map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if body.data.event_id != event_id {
            return Err(AuthenticatorError::UpstreamEventMismatch);
        }

        Ok(body)
    }

    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse> {
        let response = self
            .client
            .post(format!("{}/verify", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        match response.status().as_u16() {
            200 => response.json().await.map_err(|_| AuthenticatorError::UpstreamUnavailable),
            404 => Err(AuthenticatorError::NoPendingChallenge),
            // The arbiter collapses OTP mismatch, device mismatch, and event
            // mismatch onto 401; the body's error code disambiguates which.
            401 => {
                #[derive(serde::Deserialize)]
                struct ErrorBody {
                    code: String,
                }
                let code = response.json::<ErrorBody>().await.map(|b| b.code).unwrap_or_default();
                match code.as_str() {
                    "DEVICE_MISMATCH" => Err(AuthenticatorError::DeviceMismatch),
                    "EVENT_MISMATCH" => Err(AuthenticatorError::UpstreamEventMismatch),
                    _ => Err(AuthenticatorError::OtpInvalid),
                }
            }
            _ => Err(AuthenticatorError::UpstreamUnavailable),
        }
    }

    async fn delete_trusted_devices(&self, user_id: UserId) -> Result<u64> {
        let response = self
            .client
            .delete(format!("{}/trusted/{}", self.base_url, user_id.0))
            .send()
            .await
            .map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(AuthenticatorError::UpstreamUnavailable);
        }

        #[derive(serde::Deserialize)]
        struct DeletedCount {
            rows_removed: u64,
        }
        let body: DeletedCount =
            response.json().await.map_err(|_| AuthenticatorError::UpstreamUnavailable)?;
        Ok(body.rows_removed)
    }

    async fn delete_otp_logs(&self, email: &str) -> Result<u64> {
        let response = self
            .client
            .delete(format!("{}/otp-logs/{email}", self.base_url))
            .send()
            .await
            .map_err(|_| AuthenticatorError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(AuthenticatorError::UpstreamUnavailable);
        }

        #[derive(serde::Deserialize)]
        struct DeletedCount {
            rows_removed: u64,
        }
        let body: DeletedCount =
            response.json().await.map_err(|_| AuthenticatorError::UpstreamUnavailable)?;
        Ok(body.rows_removed)
    }
}
