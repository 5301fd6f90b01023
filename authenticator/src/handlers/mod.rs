//! HTTP handlers, one per endpoint (§4.1).
//!
//! Each handler builds an action, runs it through a fresh per-request
//! `Store` via [`run_command`], and maps the settled [`Outcome`] onto a
//! response. `amfa_runtime`'s `Store` has no blocking wait for a predicate
//! over a shared, long-lived store, so rather than bolt one on we spin up a
//! cheap, single-use `Store` per request over the shared `Environment` —
//! the environment's providers (pools, connection managers) are already
//! designed to be cloned freely.

pub mod change_password;
pub mod current_user;
pub mod delete_user;
pub mod health;
pub mod login;
pub mod logout;
pub mod register;
pub mod verify_otp;

use std::time::Duration;

use amfa_core::environment::Clock;
use amfa_runtime::Store;
use amfa_web::AppError;
use axum::http::{HeaderMap, StatusCode};

use crate::actions::AuthenticatorAction;
use crate::environment::AuthenticatorEnvironment;
use crate::error::AuthenticatorError;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::reducer::AuthenticatorReducer;
use crate::state::{AuthenticatorState, Outcome};

/// How long a handler waits for its `Store` to settle before reporting a
/// timeout (§5).
const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Drive one action through a fresh `Store` to its terminal [`Outcome`].
pub(crate) async fn run_command<U, H, G, Ca, R, M, T, Clk>(
    environment: &AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>,
    action: AuthenticatorAction,
) -> Result<Outcome, AppError>
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
    let store = Store::new(AuthenticatorState::default(), AuthenticatorReducer::new(), environment.clone());
    let mut handle = store.send(action).await;
    handle
        .wait_with_timeout(COMMAND_TIMEOUT)
        .await
        .map_err(|()| AppError::timeout("timed out waiting for the request to settle"))?;
    Ok(store.state(Clone::clone).await.outcome)
}

/// Pull the bearer credential out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("missing bearer credential"))
}

/// Map a domain error onto its HTTP response (§7).
pub(crate) fn domain_error(error: AuthenticatorError) -> AppError {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match &error {
        AuthenticatorError::InvalidCredentials => "INVALID_CREDENTIALS",
        AuthenticatorError::TokenInvalid => "TOKEN_INVALID",
        AuthenticatorError::TokenRevoked => "TOKEN_REVOKED",
        AuthenticatorError::TokenExpired => "TOKEN_EXPIRED",
        AuthenticatorError::EmailExists => "EMAIL_EXISTS",
        AuthenticatorError::PasswordConfirmationMismatch => "PASSWORD_CONFIRMATION_MISMATCH",
        AuthenticatorError::NoPendingChallenge => "NO_PENDING_CHALLENGE",
        AuthenticatorError::OtpInvalid => "OTP_INVALID",
        AuthenticatorError::DeviceMismatch => "DEVICE_MISMATCH",
        AuthenticatorError::OtpDispatchFailed => "OTP_DISPATCH_FAILED",
        AuthenticatorError::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        AuthenticatorError::UpstreamEventMismatch => "UPSTREAM_EVENT_MISMATCH",
        AuthenticatorError::UserNotFound => "USER_NOT_FOUND",
        AuthenticatorError::Internal(_) => "INTERNAL_ERROR",
    };
    AppError::new(status, error.to_string(), code.to_string())
}
