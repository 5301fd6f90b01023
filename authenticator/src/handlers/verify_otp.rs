//! `POST /verify-otp` (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::extractors::{ClientIp, UserAgent};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::actions::AuthenticatorAction;
use crate::app_state::AppState;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};
use crate::state::Outcome;

use super::{domain_error, run_command};

/// Request body for `POST /verify-otp`.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    /// Email the pending challenge was issued to.
    pub email: String,
    /// Device id presented at verification time.
    pub device_id: String,
    /// One-time code submitted by the client.
    pub otp: String,
}

/// Response body for `POST /verify-otp`.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    /// Signed bearer credential, minted with `mfa: true`.
    pub token: String,
}

/// Complete the MFA challenge issued by a prior `/login` call.
pub async fn verify_otp<U, H, G, Ca, R, M, T, Clk>(
    State(state): State<Arc<AppState<U, H, G, Ca, R, M, T, Clk>>>,
    client_ip: ClientIp,
    user_agent: UserAgent,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), amfa_web::AppError>
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
    let action = AuthenticatorAction::VerifyOtp {
        email: body.email,
        device_id: body.device_id,
        user_agent: user_agent.0,
        ip_address: client_ip.0,
        otp: body.otp,
    };
    match run_command(&state.environment, action).await? {
        Outcome::OtpVerified { token } => Ok((StatusCode::OK, Json(VerifyOtpResponse { token }))),
        Outcome::Failed(e) => Err(domain_error(e)),
        _ => Err(amfa_web::AppError::internal("unexpected outcome from /verify-otp")),
    }
}
