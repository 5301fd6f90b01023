//! `POST /predict` (§4.2).

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::AppError;
use axum::extract::State;
use axum::Json;

use crate::app_state::AppState;
use crate::providers::{LoginHistoryRepository, MfaLogClient, PredictData, PredictRequest, PredictResponse};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Score a login attempt and persist it.
pub async fn predict<Repo, Mfa, Clk>(
    State(state): State<Arc<AppState<Repo, Mfa, Clk>>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError>
where
    Repo: LoginHistoryRepository + Clone + Send + Sync + 'static,
    Mfa: MfaLogClient + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    let outcome = run_command(&state.environment, crate::actions::RiskScorerAction::Predict { request }).await?;
    match outcome {
        Outcome::Scored { event_id, risk_score, persisted } => Ok(Json(PredictResponse {
            message: "login attempt scored".to_string(),
            data: PredictData { event_id, risk_score, persisted },
        })),
        Outcome::Failed(e) => Err(domain_error(e)),
        Outcome::Pending => Err(AppError::internal("reducer left state pending")),
    }
}
