//! `DELETE /trusted/{user_id}` (§4.3).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::actions::MfaArbiterAction;
use crate::app_state::AppState;
use crate::providers::{Cache, EmailTransport, OtpLogRepository, RowsRemoved, TrustedDeviceRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Cascade-delete every device trusted for a user, ahead of account
/// deletion, keeping trust-hint cache entries coherent with the table.
pub async fn delete_trusted<Dev, Log, Ca, Em, Clk>(
    State(state): State<Arc<AppState<Dev, Log, Ca, Em, Clk>>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RowsRemoved>, amfa_web::AppError>
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    match run_command(&state.environment, MfaArbiterAction::DeleteTrustedDevices { user_id }).await? {
        Outcome::RowsRemoved { rows_removed } => Ok(Json(RowsRemoved { rows_removed })),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /trusted/{user_id}")),
    }
}
