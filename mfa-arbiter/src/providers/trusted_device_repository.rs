//! Trusted device repository: reads and writes the MFA arbiter's own
//! `trusted_devices` table (§3).

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{MfaArbiterError, Result};

use super::TrustedDevice;

/// Abstracts over the `trusted_devices` table (Postgres in production,
/// in-memory for tests).
pub trait TrustedDeviceRepository: Send + Sync {
    /// Look up a device, returning it only if trust hasn't expired.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn find_active(&self, user_id: Uuid, device_id: &str, now: DateTime<Utc>) -> Result<Option<TrustedDevice>>;

    /// Persist a device as trusted, overwriting any prior trust for the
    /// same `(user_id, device_id)`.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn upsert(&self, device: TrustedDevice) -> Result<()>;

    /// Cascade-delete every device trusted for a user.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64>;
}

/// Postgres-backed `TrustedDeviceRepository`.
#[derive(Clone)]
pub struct PostgresTrustedDeviceRepository {
    pool: sqlx::PgPool,
}

impl PostgresTrustedDeviceRepository {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl TrustedDeviceRepository for PostgresTrustedDeviceRepository {
    async fn find_active(&self, user_id: Uuid, device_id: &str, now: DateTime<Utc>) -> Result<Option<TrustedDevice>> {
        sqlx::query_as::<_, PgTrustedDeviceRow>(
            "SELECT user_id, device_id, user_agent, ip_address, created_at, expires_at \
             FROM trusted_devices WHERE user_id = $1 AND device_id = $2 AND expires_at > $3",
        )
        .bind(user_id)
        .bind(device_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MfaArbiterError::Internal(e.to_string()))?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn upsert(&self, device: TrustedDevice) -> Result<()> {
        sqlx::query(
            "INSERT INTO trusted_devices (user_id, device_id, user_agent, ip_address, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, device_id) DO UPDATE SET \
             user_agent = EXCLUDED.user_agent, ip_address = EXCLUDED.ip_address, \
             created_at = EXCLUDED.created_at, expires_at = EXCLUDED.expires_at",
        )
        .bind(device.user_id)
        .bind(&device.device_id)
        .bind(&device.user_agent)
        .bind(device.ip_address.to_string())
        .bind(device.created_at)
        .bind(device.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM trusted_devices WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct PgTrustedDeviceRow {
    user_id: Uuid,
    device_id: String,
    user_agent: String,
    ip_address: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<PgTrustedDeviceRow> for TrustedDevice {
    type Error = MfaArbiterError;

    fn try_from(row: PgTrustedDeviceRow) -> Result<Self> {
        let ip_address: IpAddr =
            row.ip_address.parse().map_err(|_| MfaArbiterError::Internal("stored ip_address is not parseable".to_string()))?;
        Ok(Self {
            user_id: row.user_id,
            device_id: row.device_id,
            user_agent: row.user_agent,
            ip_address,
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}
