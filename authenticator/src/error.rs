//! Authenticator error types.
//!
//! Mirrors the categorized style of the shared auth crate's error enum:
//! one variant per failure the spec names, a one-line doc comment on each,
//! and helper predicates so callers don't have to repeat `matches!` blocks.

use thiserror::Error;

/// Errors the authenticator's reducer and providers can produce.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum AuthenticatorError {
    // ─────────────────────────────────────────────────────────────────
    // Authentication errors
    // ─────────────────────────────────────────────────────────────────
    /// Password did not match the stored verifier.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A bearer credential failed signature verification.
    #[error("token is invalid")]
    TokenInvalid,

    /// A bearer credential's signature was valid but it has been blacklisted.
    #[error("token has been revoked")]
    TokenRevoked,

    /// A bearer credential's signature was valid but `exp` has passed.
    #[error("token has expired")]
    TokenExpired,

    // ─────────────────────────────────────────────────────────────────
    // Registration errors
    // ─────────────────────────────────────────────────────────────────
    /// `POST /register` was called with an email already on file.
    #[error("an account with this email already exists")]
    EmailExists,

    /// New password and confirmation did not match.
    #[error("new password and confirmation do not match")]
    PasswordConfirmationMismatch,

    // ─────────────────────────────────────────────────────────────────
    // MFA errors
    // ─────────────────────────────────────────────────────────────────
    /// `/verify-otp` was called but no challenge is pending for this email.
    #[error("no pending authentication challenge for this email")]
    NoPendingChallenge,

    /// The submitted one-time code did not match the pending challenge.
    #[error("one-time code is invalid")]
    OtpInvalid,

    /// The submitted device id did not match the device the challenge was
    /// issued to.
    #[error("device does not match the pending challenge")]
    DeviceMismatch,

    /// The MFA arbiter could not dispatch the one-time code over email.
    #[error("failed to send one-time code")]
    OtpDispatchFailed,

    // ─────────────────────────────────────────────────────────────────
    // Upstream / system errors
    // ─────────────────────────────────────────────────────────────────
    /// A downstream service (risk scorer or MFA arbiter) returned a
    /// non-success status that is not itself a domain rejection.
    #[error("an upstream service is unavailable")]
    UpstreamUnavailable,

    /// A downstream service replied with an `event_id` that does not match
    /// the one this request is carrying.
    #[error("upstream event id mismatch")]
    UpstreamEventMismatch,

    /// The requested user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// An unexpected, non-domain failure (database, cache, serialization).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthenticatorError {
    /// Whether this error represents a caller mistake (bad credentials,
    /// malformed request) rather than a system or upstream fault.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::TokenInvalid
                | Self::TokenRevoked
                | Self::TokenExpired
                | Self::EmailExists
                | Self::PasswordConfirmationMismatch
                | Self::NoPendingChallenge
                | Self::OtpInvalid
                | Self::DeviceMismatch
                | Self::UserNotFound
        )
    }

    /// Whether this error should be reported to the caller as an upstream
    /// failure (HTTP 502) rather than a client or server error.
    #[must_use]
    pub const fn is_upstream_issue(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable | Self::UpstreamEventMismatch)
    }

    /// Map this error onto the HTTP status code §7 assigns it.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::TokenInvalid
            | Self::TokenRevoked
            | Self::TokenExpired
            | Self::OtpInvalid
            | Self::DeviceMismatch => 401,
            Self::EmailExists | Self::PasswordConfirmationMismatch => 400,
            Self::NoPendingChallenge => 400,
            Self::UserNotFound => 404,
            Self::OtpDispatchFailed | Self::Internal(_) => 500,
            Self::UpstreamUnavailable | Self::UpstreamEventMismatch => 502,
        }
    }
}

/// Result type alias used throughout the authenticator crate.
pub type Result<T> = std::result::Result<T, AuthenticatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_is_a_user_error() {
        assert!(AuthenticatorError::InvalidCredentials.is_user_error());
        assert!(!AuthenticatorError::Internal("boom".into()).is_user_error());
    }

    #[test]
    fn upstream_errors_are_flagged() {
        assert!(AuthenticatorError::UpstreamUnavailable.is_upstream_issue());
        assert!(!AuthenticatorError::OtpInvalid.is_upstream_issue());
    }

    #[test]
    fn status_codes_match_the_contract() {
        assert_eq!(AuthenticatorError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthenticatorError::EmailExists.status_code(), 400);
        assert_eq!(AuthenticatorError::UpstreamUnavailable.status_code(), 502);
        assert_eq!(AuthenticatorError::UserNotFound.status_code(), 404);
    }
}
