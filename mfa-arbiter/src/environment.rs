//! Dependency-injection environment for the MFA arbiter's reducer.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_core::event_bus::EventBus;

use crate::providers::{Cache, EmailTransport, OtpLogRepository, TrustedDeviceRepository};

/// Every external dependency the MFA arbiter's reducer can call into.
///
/// Generic over its provider trait implementations (§10.1): swapping a mock
/// for a real backend is a type substitution at the call site, not a
/// runtime branch inside the reducer.
///
/// # Type Parameters
///
/// - `Dev`: trusted device repository
/// - `Log`: OTP log repository
/// - `Ca`: cache (pending OTP challenges, trust hints)
/// - `Em`: email transport
/// - `Clk`: clock
#[derive(Clone)]
pub struct MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>
where
    Dev: TrustedDeviceRepository + Clone,
    Log: OtpLogRepository + Clone,
    Ca: Cache + Clone,
    Em: EmailTransport + Clone,
    Clk: Clock + Clone,
{
    /// Trusted device repository (Postgres `trusted_devices` table).
    pub devices: Dev,

    /// OTP log repository (Postgres `otp_logs` table).
    pub logs: Log,

    /// Cache for pending OTP challenges and trusted-device hints.
    pub cache: Ca,

    /// Email transport for dispatching one-time codes.
    pub email: Em,

    /// Clock.
    pub clock: Clk,

    /// Event bus publisher for `mfa.completed` audit events (§4.5).
    pub event_bus: Arc<dyn EventBus>,

    /// Risk score at or above which a challenge is required.
    pub risk_threshold: u8,
}

impl<Dev, Log, Ca, Em, Clk> MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>
where
    Dev: TrustedDeviceRepository + Clone,
    Log: OtpLogRepository + Clone,
    Ca: Cache + Clone,
    Em: EmailTransport + Clone,
    Clk: Clock + Clone,
{
    /// Assemble an environment from its providers.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(devices: Dev, logs: Log, cache: Ca, email: Em, clock: Clk, event_bus: Arc<dyn EventBus>, risk_threshold: u8) -> Self {
        Self { devices, logs, cache, email, clock, event_bus, risk_threshold }
    }
}
