//! Axum state: the reducer environment plus the readiness aggregator.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_web::SystemHealthCheck;

use crate::environment::AuthenticatorEnvironment;
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};

/// Shared Axum application state.
///
/// Cloned into every request (cheap: an `Arc` plus a handful of cheaply
/// `Clone` providers), then handed to a fresh per-request `Store` built by
/// [`crate::handlers::run_command`].
#[derive(Clone)]
pub struct AppState<U, H, G, Ca, R, M, T, Clk>
where
    U: UserRepository + Clone,
    H: PasswordHasher + Clone,
    G: GeoLocator + Clone,
    Ca: Cache + Clone,
    R: RiskScorerClient + Clone,
    M: MfaArbiterClient + Clone,
    T: TokenSigner + Clone,
    Clk: Clock + Clone,
{
    /// Dependencies the reducer calls into.
    pub environment: AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>,
    /// Readiness aggregator for `GET /health/ready`.
    pub health: Arc<SystemHealthCheck>,
}

impl<U, H, G, Ca, R, M, T, Clk> AppState<U, H, G, Ca, R, M, T, Clk>
where
    U: UserRepository + Clone,
    H: PasswordHasher + Clone,
    G: GeoLocator + Clone,
    Ca: Cache + Clone,
    R: RiskScorerClient + Clone,
    M: MfaArbiterClient + Clone,
    T: TokenSigner + Clone,
    Clk: Clock + Clone,
{
    /// Pair an environment with its readiness aggregator.
    #[must_use]
    pub const fn new(
        environment: AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>,
        health: Arc<SystemHealthCheck>,
    ) -> Self {
        Self { environment, health }
    }
}
