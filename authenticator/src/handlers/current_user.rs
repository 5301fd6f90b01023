//! `GET /current-user` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::{Outcome, Role};

use super::{bearer_token, domain_error, run_command};

/// Response body for `GET /current-user`.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    /// The account's email.
    pub email: String,
    /// The account's role.
    pub role: Role,
}

/// Resolve the account behind a bearer credential.
pub async fn current_user<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, amfa_web::AppError>
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
    let token = bearer_token(&headers)?;
    match run_command(&state.environment, AuthenticatorAction::CurrentUser { token }).await? {
        Outcome::CurrentUser { email, role } => Ok(Json(CurrentUserResponse { email, role })),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /current-user")),
    }
}
