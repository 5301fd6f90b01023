//! Dependency health checking for readiness probes.
//!
//! Each service's `GET /health/ready` reports the reachability of its own
//! dependencies (database, cache) individually rather than collapsing them
//! into a single boolean, so an operator can tell *which* dependency is down
//! without reading logs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Health status of a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Functional but degraded (e.g. elevated latency).
    Degraded,
    /// Not operational.
    Unhealthy,
}

impl HealthStatus {
    /// Whether this status should still accept traffic.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Health of a single named dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Current status.
    pub status: HealthStatus,
    /// Human-readable detail.
    pub message: String,
}

impl ComponentHealth {
    /// Build a healthy result.
    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: message.into(),
        }
    }

    /// Build an unhealthy result.
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: message.into(),
        }
    }
}

/// A dependency that can report its own health (a database pool, a cache
/// client, ...).
///
/// Implemented by each service for its own Postgres pool and cache client;
/// this crate only defines the contract and the aggregation.
#[async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Check this dependency. Should complete quickly (well under the
    /// readiness probe's own timeout) so one slow dependency doesn't stall
    /// the whole report.
    async fn check_health(&self) -> ComponentHealth;

    /// Name used as the key in the readiness report (e.g. `"database"`, `"cache"`).
    fn component_name(&self) -> &str;
}

/// Aggregates health across a service's dependencies for the readiness probe.
pub struct SystemHealthCheck {
    checks: Vec<Arc<dyn HealthCheckable>>,
}

impl SystemHealthCheck {
    /// Build an aggregator over the given dependencies.
    #[must_use]
    pub fn new(checks: Vec<Arc<dyn HealthCheckable>>) -> Self {
        Self { checks }
    }

    /// Check every dependency concurrently.
    pub async fn check_all(&self) -> HashMap<String, ComponentHealth> {
        let futures = self.checks.iter().map(|check| async move {
            let name = check.component_name().to_string();
            (name, check.check_health().await)
        });

        futures::future::join_all(futures).await.into_iter().collect()
    }

    /// Overall status: unhealthy if any dependency is unhealthy, degraded if
    /// any is degraded, healthy otherwise.
    #[must_use]
    pub fn overall(results: &HashMap<String, ComponentHealth>) -> HealthStatus {
        if results.values().any(|h| h.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if results.values().any(|h| h.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Wraps a [`HealthCheckable`] with a timeout, reporting unhealthy if the
/// check doesn't complete in time rather than hanging the readiness probe.
pub struct TimeoutHealthCheck {
    inner: Arc<dyn HealthCheckable>,
    timeout: Duration,
}

impl TimeoutHealthCheck {
    /// Wrap `inner`, failing the check after `timeout` elapses.
    #[must_use]
    pub fn new(inner: Arc<dyn HealthCheckable>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl HealthCheckable for TimeoutHealthCheck {
    async fn check_health(&self) -> ComponentHealth {
        let start = Instant::now();
        match tokio::time::timeout(self.timeout, self.inner.check_health()).await {
            Ok(health) => health,
            Err(_) => ComponentHealth::unhealthy(format!(
                "timed out after {:?} ({:?} elapsed)",
                self.timeout,
                start.elapsed()
            )),
        }
    }

    fn component_name(&self) -> &str {
        self.inner.component_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockCheck {
        name: &'static str,
        status: HealthStatus,
    }

    #[async_trait]
    impl HealthCheckable for MockCheck {
        async fn check_health(&self) -> ComponentHealth {
            match self.status {
                HealthStatus::Healthy => ComponentHealth::healthy("ok"),
                HealthStatus::Degraded => ComponentHealth {
                    status: HealthStatus::Degraded,
                    message: "slow".to_string(),
                },
                HealthStatus::Unhealthy => ComponentHealth::unhealthy("down"),
            }
        }

        fn component_name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn overall_is_healthy_when_all_healthy() {
        let system = SystemHealthCheck::new(vec![
            Arc::new(MockCheck { name: "database", status: HealthStatus::Healthy }),
            Arc::new(MockCheck { name: "cache", status: HealthStatus::Healthy }),
        ]);
        let results = system.check_all().await;
        assert_eq!(SystemHealthCheck::overall(&results), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn overall_is_unhealthy_if_any_dependency_is_unhealthy() {
        let system = SystemHealthCheck::new(vec![
            Arc::new(MockCheck { name: "database", status: HealthStatus::Healthy }),
            Arc::new(MockCheck { name: "cache", status: HealthStatus::Unhealthy }),
        ]);
        let results = system.check_all().await;
        assert_eq!(SystemHealthCheck::overall(&results), HealthStatus::Unhealthy);
        assert_eq!(results["cache"].status, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn timeout_health_check_reports_unhealthy_past_deadline() {
        struct SlowCheck;

        #[async_trait]
        impl HealthCheckable for SlowCheck {
            async fn check_health(&self) -> ComponentHealth {
                tokio::time::sleep(Duration::from_secs(10)).await;
                ComponentHealth::healthy("too slow to matter")
            }

            fn component_name(&self) -> &str {
                "slow"
            }
        }

        let wrapped = TimeoutHealthCheck::new(Arc::new(SlowCheck), Duration::from_millis(50));
        let result = wrapped.check_health().await;
        assert_eq!(result.status, HealthStatus::Unhealthy);
    }
}
