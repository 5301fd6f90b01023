//! `POST /change-password` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Request body for `POST /change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Account's email.
    pub email: String,
    /// New plaintext password.
    pub new_password: String,
    /// Confirmation of the new plaintext password.
    pub confirm_password: String,
}

/// Rewrite an account's password verifier.
pub async fn change_password<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, amfa_web::AppError>
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
    let action = AuthenticatorAction::ChangePassword {
        email: body.email,
        new_password: body.new_password,
        confirm_password: body.confirm_password,
    };
    match run_command(&state.environment, action).await? {
        Outcome::PasswordChanged => Ok(StatusCode::NO_CONTENT),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /change-password")),
    }
}
