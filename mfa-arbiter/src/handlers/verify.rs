//! `POST /verify` (§4.3).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::extract::State;
use axum::Json;

use crate::actions::MfaArbiterAction;
use crate::app_state::AppState;
use crate::providers::{Cache, EmailTransport, OtpLogRepository, TrustedDeviceRepository, VerifyRequest, VerifyResponse};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Submit a one-time code for verification, fail-closed on any mismatch.
pub async fn verify<Dev, Log, Ca, Em, Clk>(
    State(state): State<Arc<AppState<Dev, Log, Ca, Em, Clk>>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, amfa_web::AppError>
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    let action = MfaArbiterAction::Verify {
        event_id: request.event_id,
        user_id: request.user_id,
        email: request.email,
        device_id: request.device_id,
        user_agent: request.user_agent,
        ip_address: request.ip_address,
        otp: request.otp,
    };
    match run_command(&state.environment, action).await? {
        Outcome::Verified { device_saved } => {
            Ok(Json(VerifyResponse { message: "one-time code verified".to_string(), device_saved }))
        }
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /verify")),
    }
}
