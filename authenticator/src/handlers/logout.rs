//! `POST /logout` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{extract::State, http::{HeaderMap, StatusCode}};

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::Outcome;

use super::{bearer_token, domain_error, run_command};

/// Blacklist the presented bearer credential for the remainder of its
/// lifetime.
pub async fn logout<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    headers: HeaderMap,
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
    let token = bearer_token(&headers)?;
    match run_command(&state.environment, AuthenticatorAction::Logout { token }).await? {
        Outcome::LoggedOut => Ok(StatusCode::NO_CONTENT),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /logout")),
    }
}
