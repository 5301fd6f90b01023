//! MFA arbiter error types.

use thiserror::Error;

/// Errors the MFA arbiter's reducer and providers can produce.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum MfaArbiterError {
    /// `/verify` was called but no challenge is pending for this email.
    #[error("no pending challenge for this email")]
    NoPendingChallenge,

    /// The submitted one-time code did not match the pending challenge.
    #[error("one-time code is invalid")]
    OtpInvalid,

    /// The submitted device id did not match the device the challenge was
    /// issued to.
    #[error("device does not match the pending challenge")]
    DeviceMismatch,

    /// The submitted event id did not match the pending challenge's event.
    #[error("event id does not match the pending challenge")]
    EventMismatch,

    /// The email transport could not dispatch the one-time code.
    #[error("failed to send one-time code")]
    OtpDispatchFailed,

    /// An unexpected, non-domain failure (database, cache, transport).
    #[error("internal error: {0}")]
    Internal(String),
}

impl MfaArbiterError {
    /// Map this error onto the HTTP status code §7 assigns it.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::OtpInvalid | Self::DeviceMismatch | Self::EventMismatch => 401,
            Self::NoPendingChallenge => 404,
            Self::OtpDispatchFailed | Self::Internal(_) => 500,
        }
    }
}

/// Result type alias used throughout the MFA arbiter crate.
pub type Result<T> = std::result::Result<T, MfaArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_contract() {
        assert_eq!(MfaArbiterError::OtpInvalid.status_code(), 401);
        assert_eq!(MfaArbiterError::NoPendingChallenge.status_code(), 404);
        assert_eq!(MfaArbiterError::DeviceMismatch.status_code(), 401);
        assert_eq!(MfaArbiterError::EventMismatch.status_code(), 401);
        assert_eq!(MfaArbiterError::OtpDispatchFailed.status_code(), 500);
    }
}
