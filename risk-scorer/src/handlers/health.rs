//! `GET /health` and `GET /health/ready` (§10.6).

use std::collections::HashMap;
use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::health::{ComponentHealth, HealthCheckable, HealthStatus};
use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app_state::AppState;
use crate::providers::{LoginHistoryRepository, MfaLogClient};

/// Liveness probe: the process is running.
#[allow(clippy::unused_async)]
pub async fn live() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: HealthStatus,
    components: HashMap<String, ComponentHealth>,
}

/// Readiness probe, reporting the risk scorer's own Postgres pool.
pub async fn ready<Repo, Mfa, Clk>(State(state): State<Arc<AppState<Repo, Mfa, Clk>>>) -> (StatusCode, Json<ReadinessResponse>)
where
    Repo: LoginHistoryRepository + Clone,
    Mfa: MfaLogClient + Clone,
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
