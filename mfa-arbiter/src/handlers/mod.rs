//! HTTP handlers, one per endpoint (§4.3).
//!
//! Each handler builds an action, runs it through a fresh per-request
//! `Store` via [`run_command`], and maps the settled [`Outcome`] onto a
//! response.

pub mod check;
pub mod delete_otp_logs;
pub mod delete_trusted;
pub mod health;
pub mod otp_logs;
pub mod verify;

use std::time::Duration;

use amfa_core::environment::Clock;
use amfa_runtime::Store;
use amfa_web::AppError;
use axum::http::StatusCode;

use crate::actions::MfaArbiterAction;
use crate::environment::MfaArbiterEnvironment;
use crate::error::MfaArbiterError;
use crate::providers::{Cache, EmailTransport, OtpLogRepository, TrustedDeviceRepository};
use crate::reducer::MfaArbiterReducer;
use crate::state::{MfaArbiterState, Outcome};

/// How long a handler waits for its `Store` to settle before reporting a
/// timeout (§5).
const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Drive one action through a fresh `Store` to its terminal [`Outcome`].
pub(crate) async fn run_command<Dev, Log, Ca, Em, Clk>(
    environment: &MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>,
    action: MfaArbiterAction,
) -> Result<Outcome, AppError>
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    let store = Store::new(MfaArbiterState::default(), MfaArbiterReducer::new(), environment.clone());
    let mut handle = store.send(action).await;
    handle
        .wait_with_timeout(COMMAND_TIMEOUT)
        .await
        .map_err(|()| AppError::timeout("timed out waiting for the request to settle"))?;
    Ok(store.state(Clone::clone).await.outcome)
}

/// Map a domain error onto its HTTP response (§7).
pub(crate) fn domain_error(error: MfaArbiterError) -> AppError {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match &error {
        MfaArbiterError::NoPendingChallenge => "NO_PENDING_CHALLENGE",
        MfaArbiterError::OtpInvalid => "OTP_INVALID",
        MfaArbiterError::DeviceMismatch => "DEVICE_MISMATCH",
        MfaArbiterError::EventMismatch => "EVENT_MISMATCH",
        MfaArbiterError::OtpDispatchFailed => "OTP_DISPATCH_FAILED",
        MfaArbiterError::Internal(_) => "INTERNAL_ERROR",
    };
    AppError::new(status, error.to_string(), code.to_string())
}
