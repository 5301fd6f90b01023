//! Provider traits: interfaces for every external dependency the
//! authenticator's reducer calls into.
//!
//! Providers are interfaces, not implementations; the reducer depends only
//! on these traits, and `main.rs` wires in the production implementations
//! while tests wire in the mocks from [`crate::mocks`].

pub mod cache;
pub mod geo_locator;
pub mod mfa_client;
pub mod password_hasher;
pub mod risk_client;
pub mod token_signer;
pub mod user_repository;

pub use cache::Cache;
pub use geo_locator::GeoLocator;
pub use mfa_client::MfaArbiterClient;
pub use password_hasher::PasswordHasher;
pub use risk_client::RiskScorerClient;
pub use token_signer::TokenSigner;
pub use user_repository::UserRepository;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{Role, UserId};

/// A user row, owned by the authenticator (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key.
    pub user_id: UserId,
    /// Unique account email.
    pub email: String,
    /// Password verifier produced by a modern KDF (Argon2id).
    pub password_hash: String,
    /// Reserved for a future SRP-based login flow; unused by password login.
    pub srp_salt: Option<Vec<u8>>,
    /// Reserved for a future SRP-based login flow; unused by password login.
    pub srp_verifier: Option<Vec<u8>>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Account role.
    pub role: Role,
}

/// Geolocation resolved for an IP address (§3, §9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    /// ISO-ish country name; `"Unknown"` when lookup failed, `"Local"` when
    /// the IP was loopback or a private/Docker-bridge range.
    pub country: String,
    /// Region/subdivision, when known.
    pub region: Option<String>,
    /// City, when known.
    pub city: Option<String>,
}

impl GeoInfo {
    /// Sentinel returned for loopback/private addresses, short-circuiting
    /// the external lookup entirely (§10.6).
    #[must_use]
    pub fn local() -> Self {
        Self { country: "Local".to_string(), region: None, city: None }
    }

    /// Sentinel returned when the external lookup fails or is inconclusive.
    #[must_use]
    pub fn unknown() -> Self {
        Self { country: "Unknown".to_string(), region: None, city: None }
    }
}

/// Request body for the risk scorer's `/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Correlation id shared across this login attempt.
    pub event_id: Uuid,
    /// The user, if the email matched an existing account.
    pub user_id: Option<UserId>,
    /// The email presented at login.
    pub email: String,
    /// Caller's IP address.
    pub ip_address: std::net::IpAddr,
    /// Caller's user agent string.
    pub user_agent: String,
    /// Resolved geolocation.
    pub geo: GeoInfo,
    /// Whether the password check passed.
    pub was_successful: bool,
}

/// Response body from the risk scorer's `/predict` (§4.4).
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
    /// Echoed correlation id; must match the request's.
    pub event_id: Uuid,
    /// Risk score in `[0, 100]`.
    pub risk_score: u8,
}

/// Request body for the MFA arbiter's `/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Correlation id shared across this login attempt.
    pub event_id: Uuid,
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's email.
    pub email: String,
    /// Client-supplied device identifier.
    pub device_id: String,
    /// Risk score from the risk scorer.
    pub risk_score: u8,
}

/// Response body from the MFA arbiter's `/check` (§4.4).
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
    /// Echoed correlation id; must match the request's.
    pub event_id: Uuid,
    /// Whether a challenge was issued.
    pub mfa_required: bool,
}

/// Request body for the MFA arbiter's `/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Correlation id carried from the original login attempt.
    pub event_id: Uuid,
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's email.
    pub email: String,
    /// Client-supplied device identifier.
    pub device_id: String,
    /// Caller's user agent string.
    pub user_agent: String,
    /// Caller's IP address.
    pub ip_address: std::net::IpAddr,
    /// One-time code submitted by the client.
    pub otp: String,
}

/// Response body from the MFA arbiter's `/verify` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Human-readable status message.
    pub message: String,
    /// Whether the device was persisted as trusted for 30 days.
    pub device_saved: bool,
}

/// Signed bearer credential claims (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's email.
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiration, Unix seconds.
    pub exp: i64,
    /// Whether this credential was issued after an MFA challenge.
    pub mfa: bool,
}
