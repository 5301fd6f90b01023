//! OTP log repository: reads and writes the MFA arbiter's own `otp_logs`
//! table (§3, §4.2). One row per state transition; never updated, only
//! appended to, so a challenge's history can be reconstructed after its
//! cache entry has expired.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{MfaArbiterError, Result};

use super::{OtpLogEntry, OtpLogStatus};

/// Abstracts over the `otp_logs` table (Postgres in production, in-memory
/// for tests).
pub trait OtpLogRepository: Send + Sync {
    /// Append one log entry.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn append(&self, entry: OtpLogEntry) -> Result<()>;

    /// Fetch every log entry for an event, newest first.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn for_event(&self, event_id: Uuid) -> Result<Vec<OtpLogEntry>>;

    /// Cascade-delete every log entry for an email.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::Internal` on a database failure.
    async fn delete_for_email(&self, email: &str) -> Result<u64>;
}

/// Postgres-backed `OtpLogRepository`.
#[derive(Clone)]
pub struct PostgresOtpLogRepository {
    pool: sqlx::PgPool,
}

impl PostgresOtpLogRepository {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl OtpLogRepository for PostgresOtpLogRepository {
    async fn append(&self, entry: OtpLogEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO otp_logs (event_id, email, status, error, timestamp) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.event_id)
        .bind(&entry.email)
        .bind(status_to_str(entry.status))
        .bind(&entry.error)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
        Ok(())
    }

    async fn for_event(&self, event_id: Uuid) -> Result<Vec<OtpLogEntry>> {
        let rows = sqlx::query_as::<_, PgOtpLogRow>(
            "SELECT event_id, email, status, error, timestamp FROM otp_logs \
             WHERE event_id = $1 ORDER BY timestamp DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_for_email(&self, email: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM otp_logs WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| MfaArbiterError::Internal(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct PgOtpLogRow {
    event_id: Uuid,
    email: String,
    status: String,
    error: Option<String>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<PgOtpLogRow> for OtpLogEntry {
    type Error = MfaArbiterError;

    fn try_from(row: PgOtpLogRow) -> Result<Self> {
        Ok(Self {
            event_id: row.event_id,
            email: row.email,
            status: str_to_status(&row.status)?,
            error: row.error,
            timestamp: row.timestamp,
        })
    }
}

fn status_to_str(status: OtpLogStatus) -> &'static str {
    match status {
        OtpLogStatus::Sent => "sent",
        OtpLogStatus::FailedSend => "failed-send",
        OtpLogStatus::NotFound => "not-found",
        OtpLogStatus::Invalid => "invalid",
        OtpLogStatus::Verified => "verified",
    }
}

fn str_to_status(s: &str) -> Result<OtpLogStatus> {
    match s {
        "sent" => Ok(OtpLogStatus::Sent),
        "failed-send" => Ok(OtpLogStatus::FailedSend),
        "not-found" => Ok(OtpLogStatus::NotFound),
        "invalid" => Ok(OtpLogStatus::Invalid),
        "verified" => Ok(OtpLogStatus::Verified),
        other => Err(MfaArbiterError::Internal(format!("unrecognized otp log status: {other}"))),
    }
}
