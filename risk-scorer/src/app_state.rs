//! Shared, `Clone`-cheap application state handed to every Axum handler.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::health::SystemHealthCheck;

use crate::environment::RiskScorerEnvironment;
use crate::providers::{LoginHistoryRepository, MfaLogClient};

/// Everything a risk scorer handler needs: the reducer environment plus
/// the process-wide health check registry.
#[derive(Clone)]
pub struct AppState<Repo, Mfa, Clk>
where
    Repo: LoginHistoryRepository + Clone,
    Mfa: MfaLogClient + Clone,
    Clk: Clock + Clone,
{
    /// Dependency-injection environment for the reducer.
    pub environment: RiskScorerEnvironment<Repo, Mfa, Clk>,
    /// Readiness probe registry.
    pub health: Arc<SystemHealthCheck>,
}

impl<Repo, Mfa, Clk> AppState<Repo, Mfa, Clk>
where
    Repo: LoginHistoryRepository + Clone,
    Mfa: MfaLogClient + Clone,
    Clk: Clock + Clone,
{
    /// Assemble the application state.
    #[must_use]
    pub const fn new(environment: RiskScorerEnvironment<Repo, Mfa, Clk>, health: Arc<SystemHealthCheck>) -> Self {
        Self { environment, health }
    }
}
