//! In-memory test doubles for every provider trait, mirroring
//! `amfa_testing`'s `FixedClock`/`InMemoryEventBus` style.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{AuthenticatorError, Result};
use crate::providers::{
    Cache, CheckData, CheckRequest, CheckResponse, Claims, GeoInfo, GeoLocator, MfaArbiterClient,
    PasswordHasher, PredictData, PredictRequest, PredictResponse, RiskScorerClient, TokenSigner,
    UserRecord, UserRepository, VerifyRequest, VerifyResponse,
};
use crate::state::UserId;

/// In-memory `UserRepository`, keyed by email and by id.
///
/// Cheaply `Clone` (an `Arc` around shared storage) so one instance can be
/// seeded in a test and then handed to an `Environment` by value.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    by_id: Arc<Mutex<HashMap<UserId, UserRecord>>>,
    by_email: Arc<Mutex<HashMap<String, UserId>>>,
}

impl MockUserRepository {
    /// Start with no users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing `create`'s email-uniqueness check.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn seed(&self, user: UserRecord) {
        self.by_email.lock().unwrap().insert(user.email.clone(), user.user_id);
        self.by_id.lock().unwrap().insert(user.user_id, user);
    }
}

impl UserRepository for MockUserRepository {
    #[allow(clippy::unwrap_used)]
    async fn get_by_email(&self, email: &str) -> Result<UserRecord> {
        let by_email = self.by_email.lock().unwrap();
        let user_id = by_email.get(email).ok_or(AuthenticatorError::UserNotFound)?;
        self.by_id.lock().unwrap().get(user_id).cloned().ok_or(AuthenticatorError::UserNotFound)
    }

    #[allow(clippy::unwrap_used)]
    async fn get_by_id(&self, user_id: UserId) -> Result<UserRecord> {
        self.by_id.lock().unwrap().get(&user_id).cloned().ok_or(AuthenticatorError::UserNotFound)
    }

    #[allow(clippy::unwrap_used)]
    async fn create(&self, user: UserRecord) -> Result<UserRecord> {
        let mut by_email = self.by_email.lock().unwrap();
        if by_email.contains_key(&user.email) {
            return Err(AuthenticatorError::EmailExists);
        }
        by_email.insert(user.email.clone(), user.user_id);
        self.by_id.lock().unwrap().insert(user.user_id, user.clone());
        Ok(user)
    }

    #[allow(clippy::unwrap_used)]
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<()> {
        let mut by_id = self.by_id.lock().unwrap();
        let user = by_id.get_mut(&user_id).ok_or(AuthenticatorError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    #[allow(clippy::unwrap_used)]
    async fn delete(&self, user_id: UserId) -> Result<()> {
        let mut by_id = self.by_id.lock().unwrap();
        let user = by_id.remove(&user_id).ok_or(AuthenticatorError::UserNotFound)?;
        self.by_email.lock().unwrap().remove(&user.email);
        Ok(())
    }

    #[allow(clippy::unwrap_used)]
    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.by_email.lock().unwrap().contains_key(email))
    }
}

/// `PasswordHasher` stand-in that stores passwords in plaintext, prefixed
/// so a real hash can never collide with it. Test-only.
#[derive(Clone, Default)]
pub struct MockPasswordHasher;

impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        Ok(format!("mock:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(hash == format!("mock:{password}"))
    }
}

/// `GeoLocator` stand-in returning a fixed result for every address.
#[derive(Clone)]
pub struct MockGeoLocator {
    result: GeoInfo,
}

impl MockGeoLocator {
    /// Always resolve to `result`.
    #[must_use]
    pub const fn new(result: GeoInfo) -> Self {
        Self { result }
    }
}

impl Default for MockGeoLocator {
    fn default() -> Self {
        Self::new(GeoInfo::unknown())
    }
}

impl GeoLocator for MockGeoLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<GeoInfo> {
        Ok(self.result.clone())
    }
}

/// In-memory `Cache` with no real TTL enforcement (entries live until
/// deleted); sufficient for reducer-level tests that don't exercise
/// expiry.
#[derive(Clone, Default)]
pub struct MockCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MockCache {
    /// Start empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MockCache {
    #[allow(clippy::unwrap_used)]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    #[allow(clippy::unwrap_used)]
    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[allow(clippy::unwrap_used)]
    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// `RiskScorerClient` stand-in returning a fixed score.
#[derive(Clone)]
pub struct MockRiskScorerClient {
    risk_score: u8,
}

impl MockRiskScorerClient {
    /// Always report `risk_score`.
    #[must_use]
    pub const fn new(risk_score: u8) -> Self {
        Self { risk_score }
    }
}

impl RiskScorerClient for MockRiskScorerClient {
    async fn predict(&self, request: PredictRequest) -> Result<PredictResponse> {
        Ok(PredictResponse {
            message: "login attempt scored".to_string(),
            data: PredictData { event_id: request.event_id, risk_score: self.risk_score },
        })
    }
}

/// `MfaArbiterClient` stand-in.
#[derive(Clone)]
pub struct MockMfaArbiterClient {
    mfa_required: bool,
    verify_result: std::result::Result<bool, AuthenticatorError>,
}

impl MockMfaArbiterClient {
    /// Always respond with `mfa_required` from `/check`, and `verify_result`
    /// from `/verify` (`Ok(device_saved)` or a domain rejection).
    #[must_use]
    pub const fn new(mfa_required: bool, verify_result: std::result::Result<bool, AuthenticatorError>) -> Self {
        Self { mfa_required, verify_result }
    }
}

impl MfaArbiterClient for MockMfaArbiterClient {
    async fn check(&self, request: CheckRequest) -> Result<CheckResponse> {
        Ok(CheckResponse {
            message: "check resolved".to_string(),
            data: CheckData { event_id: request.event_id, mfa_required: self.mfa_required },
        })
    }

    async fn verify(&self, _request: VerifyRequest) -> Result<VerifyResponse> {
        self.verify_result.clone().map(|device_saved| VerifyResponse { message: "verified".to_string(), device_saved })
    }

    async fn delete_trusted_devices(&self, _user_id: UserId) -> Result<u64> {
        Ok(0)
    }

    async fn delete_otp_logs(&self, _email: &str) -> Result<u64> {
        Ok(0)
    }
}

/// `TokenSigner` stand-in that signs claims as JSON, unsigned. Test-only.
#[derive(Clone, Default)]
pub struct MockTokenSigner;

impl TokenSigner for MockTokenSigner {
    async fn sign(&self, claims: &Claims) -> Result<String> {
        serde_json::to_string(claims).map_err(|e| AuthenticatorError::Internal(e.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<Claims> {
        serde_json::from_str(token).map_err(|_| AuthenticatorError::TokenInvalid)
    }
}
