//! `DELETE /users/{email}` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{extract::{Path, State}, Json};
use serde::Serialize;

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Response body for `DELETE /users/{email}`.
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    /// Trusted device rows removed by the MFA arbiter.
    pub devices_removed: u64,
    /// OTP log rows removed by the MFA arbiter.
    pub otp_logs_removed: u64,
}

/// Cascade-delete an account: trusted devices and OTP logs first, then the
/// user row itself (§4.1, §9).
pub async fn delete_user<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    Path(email): Path<String>,
) -> Result<Json<DeleteUserResponse>, amfa_web::AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    G: GeoLocator + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    R: RiskScorerClient + Clone + Send + Sync + 'static,
    M: MfaArbiterClient + Clone + Send + Sync + 'static,
    T: TokenSigner + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    match run_command(&state.environment, AuthenticatorAction::DeleteUser { email }).await? {
        Outcome::UserDeleted { devices_removed, otp_logs_removed } => {
            Ok(Json(DeleteUserResponse { devices_removed, otp_logs_removed }))
        }
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /users/{email}")),
    }
}
