//! Postgres helpers shared by the AMFA services.
//!
//! Each service (`authenticator`, `risk-scorer`, `mfa-arbiter`) owns its own
//! database and its own `migrations/` directory, and defines its own
//! repository types over its own tables. This crate provides only the parts
//! that are identical across all three: building a connection pool from a
//! database URL, running a service's migrations at startup, and a liveness
//! check for the readiness endpoint.
//!
//! # Example
//!
//! ```no_run
//! use amfa_postgres::{PoolConfig, create_pool, run_migrations, health_check};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(&PoolConfig::new("postgres://localhost/authenticator")).await?;
//! run_migrations(&pool, "./migrations").await?;
//! health_check(&pool).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

/// Errors from pool creation, migration, or health checks.
#[derive(Error, Debug)]
pub enum PostgresError {
    /// Failed to establish a connection pool.
    #[error("failed to connect to postgres: {0}")]
    Connect(#[source] sqlx::Error),

    /// A migration failed to apply.
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The health check query failed.
    #[error("health check failed: {0}")]
    HealthCheck(#[source] sqlx::Error),
}

/// Connection pool configuration.
///
/// Mirrors the subset of `database_url`/pool-sizing knobs each service reads
/// from its own `Config` (§10.4); this crate does not parse environment
/// variables itself.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PoolConfig {
    /// Create a pool config with sensible defaults (10 connections, 5s acquire timeout).
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Override the maximum pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Override how long to wait for a connection before failing.
    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Build a Postgres connection pool from the given configuration.
///
/// # Errors
///
/// Returns `PostgresError::Connect` if the pool cannot be established (bad
/// URL, unreachable host, auth failure).
pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, PostgresError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(PostgresError::Connect)?;

    tracing::info!(
        max_connections = config.max_connections,
        "postgres pool established"
    );

    Ok(pool)
}

/// Run the plain-SQL migrations in `migrations_dir` against `pool`.
///
/// Migrations are applied forward-only and are expected to be idempotent
/// across restarts (sqlx tracks applied versions in its own bookkeeping
/// table). Call this once at service startup, before accepting traffic.
///
/// # Errors
///
/// Returns `PostgresError::Migrate` if the migrations directory cannot be
/// read or a migration fails to apply.
pub async fn run_migrations(pool: &PgPool, migrations_dir: &str) -> Result<(), PostgresError> {
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(migrations_dir)).await?;
    migrator.run(pool).await?;
    tracing::info!(migrations_dir, "migrations applied");
    Ok(())
}

/// Check that `pool` can serve a trivial query.
///
/// Used by each service's `GET /health/ready` handler; must complete quickly
/// since it sits on the readiness path (§6).
///
/// # Errors
///
/// Returns `PostgresError::HealthCheck` if the query fails or times out.
pub async fn health_check(pool: &PgPool) -> Result<(), PostgresError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(PostgresError::HealthCheck)?;
    Ok(())
}

/// Postgres metrics recorder, matching the style of the shared runtime
/// crate's `metrics` module.
pub struct PostgresMetrics;

impl PostgresMetrics {
    /// Record a query's execution time.
    pub fn record_query(operation: &'static str, duration: Duration) {
        metrics::counter!("postgres_queries_total", "operation" => operation).increment(1);
        metrics::histogram!("postgres_query_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Record a query failure.
    pub fn record_error(operation: &'static str) {
        metrics::counter!("postgres_query_errors_total", "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_defaults() {
        let config = PoolConfig::new("postgres://localhost/test");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn pool_config_overrides() {
        let config = PoolConfig::new("postgres://localhost/test")
            .with_max_connections(25)
            .with_acquire_timeout(Duration::from_secs(2));
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn create_pool_rejects_unreachable_host() {
        let config = PoolConfig::new("postgres://nonexistent-host-amfa-test/db")
            .with_acquire_timeout(Duration::from_millis(50));
        let result = create_pool(&config).await;
        assert!(result.is_err());
    }
}
