//! Risk scorer error types.

use thiserror::Error;

/// Errors the risk scorer's reducer and providers can produce.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum RiskScorerError {
    /// A downstream service (the MFA arbiter's OTP log) returned a
    /// non-success status that is not itself a domain rejection.
    #[error("an upstream service is unavailable")]
    UpstreamUnavailable,

    /// An unexpected, non-domain failure (database, serialization).
    #[error("internal error: {0}")]
    Internal(String),
}

impl RiskScorerError {
    /// Map this error onto an HTTP status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamUnavailable => 502,
            Self::Internal(_) => 500,
        }
    }
}

/// Result type alias used throughout the risk scorer crate.
pub type Result<T> = std::result::Result<T, RiskScorerError>;
