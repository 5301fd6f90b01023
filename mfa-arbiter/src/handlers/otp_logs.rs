//! `GET /otp-logs/{event_id}` (§4.3).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::actions::MfaArbiterAction;
use crate::app_state::AppState;
use crate::providers::{Cache, EmailTransport, OtpLogRepository, OtpLogsResponse, TrustedDeviceRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Fetch the OTP log history for a login attempt, used by the risk scorer
/// to cross-check whether a past successful attempt actually completed MFA.
pub async fn otp_logs<Dev, Log, Ca, Em, Clk>(
    State(state): State<Arc<AppState<Dev, Log, Ca, Em, Clk>>>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, amfa_web::AppError>
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    match run_command(&state.environment, MfaArbiterAction::GetOtpLogs { event_id }).await? {
        Outcome::NoOtpLogs => Ok(StatusCode::NO_CONTENT.into_response()),
        Outcome::OtpLogs { sent_logs_count, verified_logs_count, logs } => {
            Ok(Json(OtpLogsResponse { sent_logs_count, verified_logs_count, logs }).into_response())
        }
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /otp-logs/{event_id}")),
    }
}
