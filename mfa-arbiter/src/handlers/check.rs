//! `POST /check` (§4.3).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::actions::MfaArbiterAction;
use crate::app_state::AppState;
use crate::providers::{Cache, CheckData, CheckRequest, CheckResponse, EmailTransport, OtpLogRepository, TrustedDeviceRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Decide whether this login needs a one-time code, issuing one if so.
pub async fn check<Dev, Log, Ca, Em, Clk>(
    State(state): State<Arc<AppState<Dev, Log, Ca, Em, Clk>>>,
    Json(request): Json<CheckRequest>,
) -> Result<(StatusCode, Json<CheckResponse>), amfa_web::AppError>
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    let action = MfaArbiterAction::Check {
        event_id: request.event_id,
        user_id: request.user_id,
        email: request.email,
        device_id: request.device_id,
        risk_score: request.risk_score,
    };
    match run_command(&state.environment, action).await? {
        Outcome::CheckResolved { event_id, mfa_required } => {
            let status = if mfa_required { StatusCode::ACCEPTED } else { StatusCode::OK };
            let message = if mfa_required { "challenge issued" } else { "no challenge required" };
            Ok((status, Json(CheckResponse { message: message.to_string(), data: CheckData { event_id, mfa_required } })))
        }
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /check")),
    }
}
