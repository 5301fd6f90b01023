//! Provider traits: interfaces for every external dependency the risk
//! scorer's reducer calls into.

pub mod history_repository;
pub mod mfa_log_client;

pub use history_repository::LoginHistoryRepository;
pub use mfa_log_client::{MfaLogClient, OtpLogSummary};

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geolocation resolved for an IP address (§3); same wire shape the
/// authenticator resolves and forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    /// `"Unknown"` when lookup failed, `"Local"` for loopback/private IPs.
    pub country: String,
    /// Region/subdivision, when known.
    pub region: Option<String>,
    /// City, when known.
    pub city: Option<String>,
}

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Correlation id shared across this login attempt.
    pub event_id: Uuid,
    /// The user, if the email matched an existing account.
    pub user_id: Option<Uuid>,
    /// The email presented at login.
    pub email: String,
    /// Caller's IP address.
    pub ip_address: IpAddr,
    /// Caller's user agent string.
    pub user_agent: String,
    /// Resolved geolocation.
    pub geo: GeoInfo,
    /// Whether the password check passed.
    pub was_successful: bool,
}

/// Response body from `POST /predict` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Human-readable status message.
    pub message: String,
    /// The scoring result.
    pub data: PredictData,
}

/// The `data` payload of a `PredictResponse`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictData {
    /// Echoed correlation id.
    pub event_id: Uuid,
    /// Risk score in `[0, 100]`.
    pub risk_score: u8,
    /// `false` when `event_id` was already on file and the stored score
    /// was returned instead of recomputing.
    pub persisted: bool,
}

/// A stored login attempt row (§3), owned by the risk scorer. Immutable
/// once inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Primary key; assigned by the authenticator before first publication.
    pub event_id: Uuid,
    /// Nullable: unknown email at login time.
    pub user_id: Option<Uuid>,
    /// The email presented at login.
    pub email: String,
    /// Caller's IP address.
    pub ip_address: IpAddr,
    /// Caller's user agent string.
    pub user_agent: String,
    /// Resolved country, `"Unknown"` or `"Local"` as sentinels.
    pub country: String,
    /// Resolved region/subdivision, when known.
    pub region: Option<String>,
    /// Resolved city, when known.
    pub city: Option<String>,
    /// When this attempt was scored.
    pub timestamp: DateTime<Utc>,
    /// Whether the password check passed.
    pub was_successful: bool,
    /// The score this attempt was assigned.
    pub risk_score: u8,
}
