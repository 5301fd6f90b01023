//! HTTP handlers: thin adapters between Axum and the per-request `Store`.

pub mod health;
pub mod predict;

use std::time::Duration;

use amfa_core::environment::Clock;
use amfa_runtime::Store;
use amfa_web::AppError;
use axum::http::StatusCode;

use crate::environment::RiskScorerEnvironment;
use crate::error::RiskScorerError;
use crate::providers::{LoginHistoryRepository, MfaLogClient};
use crate::reducer::RiskScorerReducer;
use crate::state::{Outcome, RiskScorerState};

const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Drive one command through a fresh, single-use `Store` and return its
/// terminal outcome.
pub(crate) async fn run_command<Repo, Mfa, Clk>(
    environment: &RiskScorerEnvironment<Repo, Mfa, Clk>,
    action: crate::actions::RiskScorerAction,
) -> Result<Outcome, AppError>
where
    Repo: LoginHistoryRepository + Clone + Send + Sync + 'static,
    Mfa: MfaLogClient + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    let store = Store::new(RiskScorerState::default(), RiskScorerReducer::new(), environment.clone());
    let mut handle = store.send(action).await;
    handle.wait_with_timeout(COMMAND_TIMEOUT).await.map_err(|()| AppError::timeout("timed out waiting for the request to settle"))?;
    Ok(store.state(Clone::clone).await.outcome)
}

pub(crate) fn domain_error(error: RiskScorerError) -> AppError {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match &error {
        RiskScorerError::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        RiskScorerError::Internal(_) => "INTERNAL_ERROR",
    };
    AppError::new(status, error.to_string(), code.to_string())
}
