//! Axum state: the reducer environment plus the readiness aggregator.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::SystemHealthCheck;

use crate::environment::MfaArbiterEnvironment;
use crate::providers::{Cache, EmailTransport, OtpLogRepository, TrustedDeviceRepository};

/// Shared Axum application state.
///
/// Cloned into every request (cheap: an `Arc` plus a handful of cheaply
/// `Clone` providers), then handed to a fresh per-request `Store` built by
/// [`crate::handlers::run_command`].
#[derive(Clone)]
pub struct AppState<Dev, Log, Ca, Em, Clk>
where
    Dev: TrustedDeviceRepository + Clone,
    Log: OtpLogRepository + Clone,
    Ca: Cache + Clone,
    Em: EmailTransport + Clone,
    Clk: Clock + Clone,
{
    /// Dependencies the reducer calls into.
    pub environment: MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>,
    /// Readiness aggregator for `GET /health/ready`.
    pub health: Arc<SystemHealthCheck>,
}

impl<Dev, Log, Ca, Em, Clk> AppState<Dev, Log, Ca, Em, Clk>
where
    Dev: TrustedDeviceRepository + Clone,
    Log: OtpLogRepository + Clone,
    Ca: Cache + Clone,
    Em: EmailTransport + Clone,
    Clk: Clock + Clone,
{
    /// Pair an environment with its readiness aggregator.
    #[must_use]
    pub const fn new(environment: MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>, health: Arc<SystemHealthCheck>) -> Self {
        Self { environment, health }
    }
}
