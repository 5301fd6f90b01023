//! Axum route table, generic over the reducer's provider set.

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;
use crate::handlers::{health, predict};
use crate::providers::{LoginHistoryRepository, MfaLogClient};

/// Build the risk scorer's route table.
pub fn build<Repo, Mfa, Clk>(state: Arc<AppState<Repo, Mfa, Clk>>) -> Router
where
    Repo: LoginHistoryRepository + Clone + Send + Sync + 'static,
    Mfa: MfaLogClient + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/predict", post(predict::predict::<Repo, Mfa, Clk>))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready::<Repo, Mfa, Clk>))
        .with_state(state)
}
