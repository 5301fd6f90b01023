//! `POST /register` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::{Outcome, UserId};

use super::{domain_error, run_command};

/// Request body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// New account's email.
    pub email: String,
    /// New account's plaintext password.
    pub password: String,
}

/// Response body for `POST /register`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The new account's id.
    pub user_id: UserId,
}

/// Create a new account.
pub async fn register<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), amfa_web::AppError>
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
    let action = AuthenticatorAction::Register { email: body.email, password: body.password };
    match run_command(&state.environment, action).await? {
        Outcome::Registered { user_id } => Ok((StatusCode::CREATED, Json(RegisterResponse { user_id }))),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /register")),
    }
}
