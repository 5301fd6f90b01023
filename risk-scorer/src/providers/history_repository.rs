//! Login history repository: reads and writes the risk scorer's own
//! `login_attempts` table.

use crate::error::{Result, RiskScorerError};

use super::LoginAttempt;

/// Abstracts over the `login_attempts` table (Postgres in production,
/// in-memory for tests).
pub trait LoginHistoryRepository: Send + Sync {
    /// Fetch a stored attempt by its correlation id, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RiskScorerError::Internal` on a database failure.
    async fn find(&self, event_id: uuid::Uuid) -> Result<Option<LoginAttempt>>;

    /// Every prior attempt for an email, newest first. Excludes no rows;
    /// the scoring algorithm is responsible for windowing.
    ///
    /// # Errors
    ///
    /// Returns `RiskScorerError::Internal` on a database failure.
    async fn history_for_email(&self, email: &str) -> Result<Vec<LoginAttempt>>;

    /// Insert a new attempt. Returns `false` without error if `event_id`
    /// was already on file (idempotent by primary key).
    ///
    /// # Errors
    ///
    /// Returns `RiskScorerError::Internal` on a database failure.
    async fn insert(&self, attempt: LoginAttempt) -> Result<bool>;
}

/// Postgres-backed `LoginHistoryRepository`.
#[derive(Clone)]
pub struct PostgresHistoryRepository {
    pool: sqlx::PgPool,
}

impl PostgresHistoryRepository {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl LoginHistoryRepository for PostgresHistoryRepository {
    async fn find(&self, event_id: uuid::Uuid) -> Result<Option<LoginAttempt>> {
        sqlx::query_as::<_, PgAttemptRow>(
            "SELECT event_id, user_id, email, ip_address, user_agent, country, region, city, \
             timestamp, was_successful, risk_score FROM login_attempts WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RiskScorerError::Internal(e.to_string()))
        .map(|row| row.map(Into::into))
    }

    async fn history_for_email(&self, email: &str) -> Result<Vec<LoginAttempt>> {
        let rows = sqlx::query_as::<_, PgAttemptRow>(
            "SELECT event_id, user_id, email, ip_address, user_agent, country, region, city, \
             timestamp, was_successful, risk_score FROM login_attempts \
             WHERE email = $1 ORDER BY timestamp DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RiskScorerError::Internal(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, attempt: LoginAttempt) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO login_attempts \
             (event_id, user_id, email, ip_address, user_agent, country, region, city, \
              timestamp, was_successful, risk_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(attempt.event_id)
        .bind(attempt.user_id)
        .bind(&attempt.email)
        .bind(attempt.ip_address.to_string())
        .bind(&attempt.user_agent)
        .bind(&attempt.country)
        .bind(&attempt.region)
        .bind(&attempt.city)
        .bind(attempt.timestamp)
        .bind(attempt.was_successful)
        .bind(i16::from(attempt.risk_score))
        .execute(&self.pool)
        .await
        .map_err(|e| RiskScorerError::Internal(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct PgAttemptRow {
    event_id: uuid::Uuid,
    user_id: Option<uuid::Uuid>,
    email: String,
    ip_address: String,
    user_agent: String,
    country: String,
    region: Option<String>,
    city: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
    was_successful: bool,
    risk_score: i16,
}

impl From<PgAttemptRow> for LoginAttempt {
    fn from(row: PgAttemptRow) -> Self {
        Self {
            event_id: row.event_id,
            user_id: row.user_id,
            email: row.email,
            ip_address: row.ip_address.parse().unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)),
            user_agent: row.user_agent,
            country: row.country,
            region: row.region,
            city: row.city,
            timestamp: row.timestamp,
            was_successful: row.was_successful,
            risk_score: row.risk_score.clamp(0, 100) as u8,
        }
    }
}
