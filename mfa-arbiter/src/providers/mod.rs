//! Provider traits: interfaces for every external dependency the MFA
//! arbiter's reducer calls into.

pub mod cache;
pub mod email_transport;
pub mod otp_log_repository;
pub mod trusted_device_repository;

pub use cache::Cache;
pub use email_transport::EmailTransport;
pub use otp_log_repository::OtpLogRepository;
pub use trusted_device_repository::TrustedDeviceRepository;

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for `POST /check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Correlation id shared across this login attempt.
    pub event_id: Uuid,
    /// The authenticated user.
    pub user_id: Uuid,
    /// The user's email.
    pub email: String,
    /// Client-supplied device identifier.
    pub device_id: String,
    /// Risk score from the risk scorer.
    pub risk_score: u8,
}

/// Response body from `POST /check` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Human-readable status message.
    pub message: String,
    /// The check result.
    pub data: CheckData,
}

/// The `data` payload of a `CheckResponse`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckData {
    /// Echoed correlation id.
    pub event_id: Uuid,
    /// Whether a challenge was issued.
    pub mfa_required: bool,
}

/// Request body for `POST /verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Correlation id carried from the original login attempt.
    pub event_id: Uuid,
    /// The authenticated user.
    pub user_id: Uuid,
    /// The user's email.
    pub email: String,
    /// Client-supplied device identifier.
    pub device_id: String,
    /// Caller's user agent string.
    pub user_agent: String,
    /// Caller's IP address.
    pub ip_address: IpAddr,
    /// One-time code submitted by the client.
    pub otp: String,
}

/// Response body from `POST /verify` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Human-readable status message.
    pub message: String,
    /// Whether the device was persisted as trusted for 30 days.
    pub device_saved: bool,
}

/// Response body from `GET /otp-logs/{event_id}`, when any logs exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpLogsResponse {
    /// Number of `sent` log rows for this event.
    pub sent_logs_count: u32,
    /// Number of `verified` log rows for this event.
    pub verified_logs_count: u32,
    /// The full log history for this event, newest first.
    pub logs: Vec<OtpLogEntry>,
}

/// Response body from `DELETE /trusted/{user_id}` and
/// `DELETE /otp-logs/{email}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RowsRemoved {
    /// Number of rows removed.
    pub rows_removed: u64,
}

/// A device remembered as trusted for a user, owned by the MFA arbiter
/// (§3). Composite key: `(user_id, device_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedDevice {
    /// The account this device belongs to.
    pub user_id: Uuid,
    /// Client-supplied device identifier.
    pub device_id: String,
    /// User agent string observed when the device was trusted.
    pub user_agent: String,
    /// IP address observed when the device was trusted.
    pub ip_address: IpAddr,
    /// When this device was first trusted.
    pub created_at: DateTime<Utc>,
    /// When trust expires; the device must re-verify afterward.
    pub expires_at: DateTime<Utc>,
}

/// One state transition in an OTP challenge's lifecycle, retained so a
/// challenge's history can be reconstructed after the cache entry expires
/// (§3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpLogStatus {
    /// A one-time code was generated and dispatched.
    Sent,
    /// The email transport failed to dispatch the code.
    FailedSend,
    /// `/verify` was called with no pending challenge for the email.
    NotFound,
    /// The submitted code, device id, or event id didn't match the pending
    /// challenge.
    Invalid,
    /// The submitted code was accepted.
    Verified,
}

/// One row of the OTP log (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpLogEntry {
    /// Correlation id of the login attempt this log entry belongs to.
    pub event_id: Uuid,
    /// The email the challenge was issued to or submitted against.
    pub email: String,
    /// This transition's outcome.
    pub status: OtpLogStatus,
    /// Transport or validation error detail, when `status` carries one.
    pub error: Option<String>,
    /// When this transition was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A pending one-time code challenge, cache-only (§3). Key:
/// `otp:{email}`. Exactly one live challenge per email; a new issuance
/// overwrites the previous one outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// The generated one-time code.
    pub otp: String,
    /// Correlation id of the login attempt the challenge was issued for.
    pub event_id: Uuid,
    /// The device id the challenge was issued to.
    pub device_id: String,
}
