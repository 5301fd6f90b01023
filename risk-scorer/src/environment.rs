//! Dependency-injection environment for the risk scorer's reducer.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_core::event_bus::EventBus;

use crate::providers::{LoginHistoryRepository, MfaLogClient};
use crate::verification_cache::VerificationCache;

/// Every external dependency the risk scorer's reducer can call into.
///
/// # Type Parameters
///
/// - `Repo`: login attempt history repository
/// - `Mfa`: MFA arbiter OTP log client, for verifying past successes
/// - `Clk`: clock
#[derive(Clone)]
pub struct RiskScorerEnvironment<Repo, Mfa, Clk>
where
    Repo: LoginHistoryRepository + Clone,
    Mfa: MfaLogClient + Clone,
    Clk: Clock + Clone,
{
    /// Login attempt history (Postgres `login_attempts` table).
    pub history: Repo,

    /// MFA arbiter OTP log client.
    pub mfa_logs: Mfa,

    /// Clock.
    pub clock: Clk,

    /// Per-process `{event_id -> verified}` memoization table (§4.2, §5).
    pub verification_cache: VerificationCache,

    /// Event bus publisher for `risk.scored` audit events (§4.5).
    pub event_bus: Arc<dyn EventBus>,
}

impl<Repo, Mfa, Clk> RiskScorerEnvironment<Repo, Mfa, Clk>
where
    Repo: LoginHistoryRepository + Clone,
    Mfa: MfaLogClient + Clone,
    Clk: Clock + Clone,
{
    /// Assemble an environment from its providers.
    #[must_use]
    pub fn new(history: Repo, mfa_logs: Mfa, clock: Clk, event_bus: Arc<dyn EventBus>) -> Self {
        Self { history, mfa_logs, clock, verification_cache: VerificationCache::new(), event_bus }
    }
}
