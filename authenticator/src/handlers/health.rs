//! `GET /health` and `GET /health/ready` (§10.6).

use std::collections::HashMap;
use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::health::{ComponentHealth, HealthCheckable, HealthStatus};
use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};

/// Liveness probe: the process is running. Dependencies are not checked
/// here; see `/health/ready` for that.
#[allow(clippy::unused_async)]
pub async fn live() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: HealthStatus,
    components: HashMap<String, ComponentHealth>,
}

/// Readiness probe, reporting the authenticator's own Postgres pool and
/// cache client individually.
pub async fn ready<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
) -> (StatusCode, Json<ReadinessResponse>)
where
    U: UserRepository + Clone,
    H: PasswordHasher + Clone,
    G: GeoLocator + Clone,
    Ca: Cache + Clone,
    R: RiskScorerClient + Clone,
    M: MfaArbiterClient + Clone,
    T: TokenSigner + Clone,
    Clk: Clock + Clone,
{
    let components = state.health.check_all().await;
    let status = amfa_web::health::SystemHealthCheck::overall(&components);
    let http_status = if status.is_ready() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (http_status, Json(ReadinessResponse { status, components }))
}

/// `HealthCheckable` over a Postgres pool: pings with `SELECT 1`.
pub struct PostgresHealthCheck {
    pool: sqlx::PgPool,
}

impl PostgresHealthCheck {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheckable for PostgresHealthCheck {
    async fn check_health(&self) -> ComponentHealth {
        match amfa_postgres::health_check(&self.pool).await {
            Ok(()) => ComponentHealth::healthy("connected"),
            Err(e) => ComponentHealth::unhealthy(e.to_string()),
        }
    }

    fn component_name(&self) -> &str {
        "database"
    }
}

/// `HealthCheckable` over the Redis connection manager backing the cache.
pub struct RedisHealthCheck {
    manager: redis::aio::ConnectionManager,
}

impl RedisHealthCheck {
    /// Wrap an existing connection manager.
    #[must_use]
    pub const fn new(manager: redis::aio::ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl HealthCheckable for RedisHealthCheck {
    async fn check_health(&self) -> ComponentHealth {
        use redis::AsyncCommands;
        let mut conn = self.manager.clone();
        match conn.set_ex::<_, _, ()>("health:ping", "1", 5).await {
            Ok(()) => ComponentHealth::healthy("connected"),
            Err(e) => ComponentHealth::unhealthy(e.to_string()),
        }
    }

    fn component_name(&self) -> &str {
        "cache"
    }
}
