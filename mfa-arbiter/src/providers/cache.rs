//! Cache-only state: pending OTP challenges and trusted-device hints (§3).

use std::time::Duration;

use crate::error::{MfaArbiterError, Result};

/// Abstracts over a Redis-compatible key/value cache with TTLs.
pub trait Cache: Send + Sync {
    /// Fetch a value, if present and not expired.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a transport failure.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with a TTL, overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a transport failure.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a key.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a transport failure.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every key starting with `prefix`.
    ///
    /// Used to keep trusted-device hints coherent with the authoritative
    /// table: a cascading `DELETE /trusted/{user_id}` must not leave a stale
    /// `trusted:{user_id}:*` hint behind for a device that was just revoked.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a transport failure.
    async fn delete_prefix(&self, prefix: &str) -> Result<()>;
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
        conn.get(key).await.map_err(|e| MfaArbiterError::Internal(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await.map_err(|e| MfaArbiterError::Internal(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await.map_err(|e| MfaArbiterError::Internal(e.to_string()))
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        let pattern = format!("{prefix}*");
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await
                .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;

            if !keys.is_empty() {
                conn.del::<_, ()>(keys).await.map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
            }

            if next_cursor == 0 {
                break;
            }
            cursor = next_cursor;
        }
        Ok(())
    }
}
