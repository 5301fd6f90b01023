//! Cache-only state: pending MFA challenges, the token blacklist, and
//! geolocation lookups (§3).

use std::time::Duration;

use crate::error::{AuthenticatorError, Result};

/// Abstracts over a Redis-compatible key/value cache with TTLs.
pub trait Cache: Send + Sync {
    /// Fetch a value, if present and not expired.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` on a transport failure.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with a TTL, overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` on a transport failure.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a key.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` on a transport failure.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Redis-backed `Cache`.
#[derive(Clone)]
pub struct RedisCache {
    manager: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Wrap an existing Redis connection manager.
    #[must_use]
    pub const fn new(manager: redis::aio::ConnectionManager) -> Self {
        Self { manager }
    }
}

impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(|e| AuthenticatorError::Internal(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| AuthenticatorError::Internal(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await.map_err(|e| AuthenticatorError::Internal(e.to_string()))
    }
}
