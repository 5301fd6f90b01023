//! The MFA arbiter's action enum: one command per endpoint, plus the
//! terminal events the reducer's effects dispatch back once the underlying
//! I/O has resolved.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MfaArbiterError;
use crate::providers::OtpLogEntry;

/// Every action the MFA arbiter's reducer can receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MfaArbiterAction {
    // ─────────────────────────────────────────────────────────────────
    // Check
    // ─────────────────────────────────────────────────────────────────
    /// `POST /check`.
    Check {
        /// Correlation id shared across this login attempt.
        event_id: Uuid,
        /// The authenticated user.
        user_id: Uuid,
        /// The user's email.
        email: String,
        /// Client-supplied device identifier.
        device_id: String,
        /// Risk score from the risk scorer.
        risk_score: u8,
    },
    /// The check saga finished.
    CheckCompleted(Result<CheckOutcome, MfaArbiterError>),

    // ─────────────────────────────────────────────────────────────────
    // Verify
    // ─────────────────────────────────────────────────────────────────
    /// `POST /verify`.
    Verify {
        /// Correlation id carried from the original login attempt.
        event_id: Uuid,
        /// The authenticated user.
        user_id: Uuid,
        /// The user's email.
        email: String,
        /// Client-supplied device identifier.
        device_id: String,
        /// Caller's user agent string.
        user_agent: String,
        /// Caller's IP address.
        ip_address: IpAddr,
        /// One-time code submitted by the client.
        otp: String,
    },
    /// The verification saga finished.
    VerifyCompleted(Result<bool, MfaArbiterError>),

    // ─────────────────────────────────────────────────────────────────
    // OTP logs
    // ─────────────────────────────────────────────────────────────────
    /// `GET /otp-logs/{event_id}`.
    GetOtpLogs {
        /// Correlation id to fetch logs for.
        event_id: Uuid,
    },
    /// The log fetch finished.
    GetOtpLogsCompleted(Result<Vec<OtpLogEntry>, MfaArbiterError>),

    // ─────────────────────────────────────────────────────────────────
    // Cascading deletes
    // ─────────────────────────────────────────────────────────────────
    /// `DELETE /trusted/{user_id}`.
    DeleteTrustedDevices {
        /// The account to revoke every trusted device for.
        user_id: Uuid,
    },
    /// The cascading delete finished.
    DeleteTrustedDevicesCompleted(Result<u64, MfaArbiterError>),

    /// `DELETE /otp-logs/{email}`.
    DeleteOtpLogs {
        /// The account's email to remove every log row for.
        email: String,
    },
    /// The cascading delete finished.
    DeleteOtpLogsCompleted(Result<u64, MfaArbiterError>),
}

/// Outcome of a completed `/check` saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Correlation id echoed from the request.
    pub event_id: Uuid,
    /// Whether a challenge was issued.
    pub mfa_required: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_json() {
        let action = MfaArbiterAction::Check {
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            device_id: "device-1".to_string(),
            risk_score: 80,
        };
        let json = serde_json::to_string(&action).unwrap();
        let _: MfaArbiterAction = serde_json::from_str(&json).unwrap();
    }
}
