//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::health::SystemHealthCheck;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service process is running. Does NOT
/// check dependencies (database, cache) - use `/health/ready` for that.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: crate::health::HealthStatus,
    components: std::collections::HashMap<String, crate::health::ComponentHealth>,
}

/// Readiness check, reporting the status of each dependency individually.
///
/// # Status Codes
///
/// - 200 OK: every dependency healthy or degraded
/// - 503 Service Unavailable: at least one dependency unhealthy
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
pub async fn health_check_ready(
    State(checks): State<Arc<SystemHealthCheck>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let components = checks.check_all().await;
    let status = SystemHealthCheck::overall(&components);

    let http_status = if status.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(ReadinessResponse { status, components }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{ComponentHealth, HealthCheckable};
    use async_trait::async_trait;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    struct AlwaysHealthy;

    #[async_trait]
    impl HealthCheckable for AlwaysHealthy {
        async fn check_health(&self) -> ComponentHealth {
            ComponentHealth::healthy("ok")
        }

        fn component_name(&self) -> &str {
            "database"
        }
    }

    struct AlwaysUnhealthy;

    #[async_trait]
    impl HealthCheckable for AlwaysUnhealthy {
        async fn check_health(&self) -> ComponentHealth {
            ComponentHealth::unhealthy("connection refused")
        }

        fn component_name(&self) -> &str {
            "cache"
        }
    }

    #[tokio::test]
    async fn test_ready_when_all_dependencies_healthy() {
        let checks = Arc::new(SystemHealthCheck::new(vec![Arc::new(AlwaysHealthy)]));
        let (status, Json(body)) = health_check_ready(State(checks)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.status.is_ready());
    }

    #[tokio::test]
    async fn test_unready_when_a_dependency_is_unhealthy() {
        let checks = Arc::new(SystemHealthCheck::new(vec![
            Arc::new(AlwaysHealthy),
            Arc::new(AlwaysUnhealthy),
        ]));
        let (status, Json(body)) = health_check_ready(State(checks)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.status.is_ready());
        assert_eq!(body.components["cache"].message, "connection refused");
    }
}
