//! `POST /login` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::extractors::{ClientIp, UserAgent};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email presented at login.
    pub email: String,
    /// Plaintext password presented at login.
    pub password: String,
    /// Client-supplied device identifier.
    pub device_id: String,
}

/// Response body for `POST /login`.
///
/// Exactly one of `token` or `event_id` is present, depending on whether the
/// risk scorer and MFA arbiter required a challenge (§4.1, §4.4).
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer credential, present when no challenge was required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Pending challenge's correlation id, present when a challenge was
    /// issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
}

/// Authenticate with a password, possibly issuing an MFA challenge.
pub async fn login<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    client_ip: ClientIp,
    user_agent: UserAgent,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), amfa_web::AppError>
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
    let action = AuthenticatorAction::Login {
        email: body.email,
        password: body.password,
        device_id: body.device_id,
        client_ip: client_ip.0,
        user_agent: user_agent.0,
    };
    match run_command(&state.environment, action).await? {
        Outcome::LoggedIn { token } => {
            Ok((StatusCode::OK, Json(LoginResponse { token: Some(token), event_id: None })))
        }
        Outcome::MfaRequired { event_id } => {
            Ok((StatusCode::ACCEPTED, Json(LoginResponse { token: None, event_id: Some(event_id) })))
        }
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /login")),
    }
}
