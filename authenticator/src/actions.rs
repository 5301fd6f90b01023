//! The authenticator's action enum: one command per endpoint, plus the
//! terminal events the reducer's effects dispatch back once the underlying
//! I/O has resolved.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthenticatorError;

/// Every action the authenticator's reducer can receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthenticatorAction {
    // ─────────────────────────────────────────────────────────────────
    // Register
    // ─────────────────────────────────────────────────────────────────
    /// `POST /register`.
    Register {
        /// New account's email.
        email: String,
        /// New account's plaintext password.
        password: String,
    },
    /// Registration finished (successfully or not).
    RegisterCompleted(Result<crate::state::UserId, AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Login
    // ─────────────────────────────────────────────────────────────────
    /// `POST /login`.
    Login {
        /// Email presented at login.
        email: String,
        /// Plaintext password presented at login.
        password: String,
        /// Client-supplied device identifier.
        device_id: String,
        /// Caller's IP address.
        client_ip: IpAddr,
        /// Caller's user agent string.
        user_agent: String,
    },
    /// The login saga finished: a credential was minted, a challenge was
    /// issued, or the attempt was rejected.
    LoginCompleted(Result<LoginOutcome, AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Verify OTP
    // ─────────────────────────────────────────────────────────────────
    /// `POST /verify-otp`.
    VerifyOtp {
        /// Email the pending challenge was issued to.
        email: String,
        /// Device id presented at verification time.
        device_id: String,
        /// Caller's user agent string.
        user_agent: String,
        /// Caller's IP address.
        ip_address: IpAddr,
        /// One-time code submitted by the client.
        otp: String,
    },
    /// The OTP verification saga finished.
    VerifyOtpCompleted(Result<String, AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Logout
    // ─────────────────────────────────────────────────────────────────
    /// `POST /logout`.
    Logout {
        /// Bearer credential to blacklist.
        token: String,
    },
    /// Logout finished.
    LogoutCompleted(Result<(), AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Current user
    // ─────────────────────────────────────────────────────────────────
    /// `GET /current-user`.
    CurrentUser {
        /// Bearer credential presented by the client.
        token: String,
    },
    /// Credential resolution finished.
    CurrentUserCompleted(Result<(String, crate::state::Role), AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Change password
    // ─────────────────────────────────────────────────────────────────
    /// `POST /change-password`.
    ChangePassword {
        /// Account's email.
        email: String,
        /// New plaintext password.
        new_password: String,
        /// Confirmation of the new plaintext password.
        confirm_password: String,
    },
    /// Password change finished.
    ChangePasswordCompleted(Result<(), AuthenticatorError>),

    // ─────────────────────────────────────────────────────────────────
    // Delete user
    // ─────────────────────────────────────────────────────────────────
    /// `DELETE /users/{email}`.
    DeleteUser {
        /// Account's email.
        email: String,
    },
    /// Cascading account deletion finished.
    DeleteUserCompleted(Result<DeletionCounts, AuthenticatorError>),
}

/// Outcome of a completed login saga.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// No challenge was required; a credential was minted outright.
    Credential(String),
    /// A challenge was issued; the client must call `/verify-otp`.
    MfaRequired(Uuid),
}

/// Row counts removed by the MFA arbiter during a cascading user deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionCounts {
    /// Trusted device rows removed.
    pub devices_removed: u64,
    /// OTP log rows removed.
    pub otp_logs_removed: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_json() {
        let action = AuthenticatorAction::Login {
            email: "a@example.com".to_string(),
            password: "hunter2".to_string(),
            device_id: "device-1".to_string(),
            client_ip: "127.0.0.1".parse().unwrap(),
            user_agent: "test-agent".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        let _: AuthenticatorAction = serde_json::from_str(&json).unwrap();
    }
}
