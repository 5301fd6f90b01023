//! Request-scoped state for the authenticator's reducer.
//!
//! Unlike a long-lived aggregate (an order, a shopping cart), every request
//! this service handles is a self-contained unit of work: a login either
//! succeeds, fails, or asks for a one-time code, and that is the end of the
//! story for that particular `Store`. A fresh `AuthenticatorState` is created
//! per request and discarded once the handler has read the final outcome.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthenticatorError;

/// A user's primary key, generated client-side of the database (`UUIDv4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh, random user id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Account role, gating nothing in this service but carried through the
/// credential so downstream services can make authorization decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
pub enum Role {
    /// A regular account.
    User,
    /// An operator account.
    Admin,
}

/// The terminal outcome of one request, once the reducer has finished
/// reacting to every effect it dispatched.
///
/// A handler waits for the `Store` to settle and then matches on this to
/// build its HTTP response; see `amfa_web`'s health check handler for the
/// same "drive to completion, then read state" shape applied to readiness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The reducer has not yet produced a terminal outcome.
    #[default]
    Pending,

    /// `POST /register` created a new user.
    Registered {
        /// The new user's id.
        user_id: UserId,
    },

    /// `POST /login` succeeded outright; no challenge was required.
    LoggedIn {
        /// Signed bearer credential.
        token: String,
    },

    /// `POST /login` issued a challenge; the client must call
    /// `/verify-otp` with the same event before a credential is minted.
    MfaRequired {
        /// The event id that correlates the login attempt with the pending
        /// challenge.
        event_id: Uuid,
    },

    /// `POST /verify-otp` succeeded; a credential with `mfa: true` was
    /// minted.
    OtpVerified {
        /// Signed bearer credential.
        token: String,
    },

    /// `POST /logout` blacklisted the presented credential.
    LoggedOut,

    /// `GET /current-user` resolved a valid, non-blacklisted credential.
    CurrentUser {
        /// The account's email.
        email: String,
        /// The account's role.
        role: Role,
    },

    /// `POST /change-password` rewrote the verifier.
    PasswordChanged,

    /// `DELETE /users/{email}` cascaded through dependent services and
    /// removed the user row.
    UserDeleted {
        /// Trusted device rows removed by the MFA arbiter.
        devices_removed: u64,
        /// OTP log rows removed by the MFA arbiter.
        otp_logs_removed: u64,
    },

    /// The request failed; see the embedded error for why.
    Failed(AuthenticatorError),
}

/// The authenticator reducer's entire state.
///
/// A single field today, but kept as a struct (rather than re-exporting
/// `Outcome` directly) so a future addition — a correlation id carried
/// through to logging, say — has somewhere to live without reshaping every
/// call site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatorState {
    /// The request's terminal outcome, or `Outcome::Pending` while effects
    /// are still in flight.
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_generates_distinct_values() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn default_state_is_pending() {
        assert_eq!(AuthenticatorState::default().outcome, Outcome::Pending);
    }
}
