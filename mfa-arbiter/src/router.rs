//! Axum route table, generic over the reducer's provider set.

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::app_state::AppState;
use crate::handlers::{check, delete_otp_logs, delete_trusted, health, otp_logs, verify};
use crate::providers::{Cache, EmailTransport, OtpLogRepository, TrustedDeviceRepository};

/// Build the MFA arbiter's route table.
pub fn build<Dev, Log, Ca, Em, Clk>(state: Arc<AppState<Dev, Log, Ca, Em, Clk>>) -> Router
where
    Dev: TrustedDeviceRepository + Clone + Send + Sync + 'static,
    Log: OtpLogRepository + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    Em: EmailTransport + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/check", post(check::check::<Dev, Log, Ca, Em, Clk>))
        .route("/verify", post(verify::verify::<Dev, Log, Ca, Em, Clk>))
        .route(
            "/otp-logs/:id",
            get(otp_logs::otp_logs::<Dev, Log, Ca, Em, Clk>).delete(delete_otp_logs::delete_otp_logs::<Dev, Log, Ca, Em, Clk>),
        )
        .route("/trusted/:user_id", delete(delete_trusted::delete_trusted::<Dev, Log, Ca, Em, Clk>))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready::<Dev, Log, Ca, Em, Clk>))
        .with_state(state)
}
