//! In-memory test doubles for every provider trait, mirroring
//! `amfa_testing`'s `FixedClock`/`InMemoryEventBus` style.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{MfaArbiterError, Result};
use crate::providers::{Cache, EmailTransport, OtpLogEntry, OtpLogRepository, TrustedDevice, TrustedDeviceRepository};

/// In-memory `TrustedDeviceRepository`, keyed by `(user_id, device_id)`.
#[derive(Clone, Default)]
pub struct InMemoryTrustedDeviceRepository {
    devices: Arc<Mutex<HashMap<(Uuid, String), TrustedDevice>>>,
}

impl InMemoryTrustedDeviceRepository {
    /// Start with no trusted devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrustedDeviceRepository for InMemoryTrustedDeviceRepository {
    async fn find_active(&self, user_id: Uuid, device_id: &str, now: DateTime<Utc>) -> Result<Option<TrustedDevice>> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .get(&(user_id, device_id.to_string()))
            .filter(|device| device.expires_at > now)
            .cloned())
    }

    async fn upsert(&self, device: TrustedDevice) -> Result<()> {
        self.devices.lock().unwrap().insert((device.user_id, device.device_id.clone()), device);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut devices = self.devices.lock().unwrap();
        let before = devices.len();
        devices.retain(|(id, _), _| *id != user_id);
        Ok((before - devices.len()) as u64)
    }
}

/// In-memory `OtpLogRepository`, storing every appended entry in order.
#[derive(Clone, Default)]
pub struct InMemoryOtpLogRepository {
    entries: Arc<Mutex<Vec<OtpLogEntry>>>,
}

impl InMemoryOtpLogRepository {
    /// Start with no log entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OtpLogRepository for InMemoryOtpLogRepository {
    async fn append(&self, entry: OtpLogEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    async fn for_event(&self, event_id: Uuid) -> Result<Vec<OtpLogEntry>> {
        let mut matching: Vec<OtpLogEntry> = self.entries.lock().unwrap().iter().filter(|e| e.event_id == event_id).cloned().collect();
        matching.reverse();
        Ok(matching)
    }

    async fn delete_for_email(&self, email: &str) -> Result<u64> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.email != email);
        Ok((before - entries.len()) as u64)
    }
}

/// In-memory `Cache` with no real TTL enforcement (entries live until
/// deleted); sufficient for reducer-level tests that don't exercise expiry.
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
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        self.entries.lock().unwrap().retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

/// `EmailTransport` stand-in that never actually sends anything.
#[derive(Clone)]
pub struct MockEmailTransport {
    succeeds: bool,
}

impl MockEmailTransport {
    /// Succeed or fail every `send_otp` call according to `succeeds`.
    #[must_use]
    pub const fn new(succeeds: bool) -> Self {
        Self { succeeds }
    }
}

impl EmailTransport for MockEmailTransport {
    async fn send_otp(&self, _to: &str, _otp: &str) -> Result<()> {
        if self.succeeds {
            Ok(())
        } else {
            Err(MfaArbiterError::OtpDispatchFailed)
        }
    }
}
