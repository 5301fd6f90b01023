//! Dependency-injection environment for the authenticator's reducer.

use std::sync::Arc;

use amfa_core::environment::Clock;
use amfa_core::event_bus::EventBus;

use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};

/// Every external dependency the authenticator's reducer can call into.
///
/// Generic over its provider trait implementations (§10.1): swapping a mock
/// for a real backend is a type substitution at the call site, not a
/// runtime branch inside the reducer.
///
/// # Type Parameters
///
/// - `U`: user repository
/// - `H`: password hasher
/// - `G`: IP geolocator
/// - `Ca`: cache (pending MFA, token blacklist, geolocation)
/// - `R`: risk scorer client
/// - `M`: MFA arbiter client
/// - `T`: bearer token signer
/// - `Clk`: clock
#[derive(Clone)]
pub struct AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>
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
    /// User repository (Postgres `users` table).
    pub users: U,

    /// Password hasher (Argon2id).
    pub password_hasher: H,

    /// IP geolocator.
    pub geo: G,

    /// Cache for pending MFA challenges, the token blacklist, and
    /// geolocation lookups.
    pub cache: Ca,

    /// Risk scorer client.
    pub risk_scorer: R,

    /// MFA arbiter client.
    pub mfa_arbiter: M,

    /// Bearer credential signer.
    pub token_signer: T,

    /// Clock.
    pub clock: Clk,

    /// Event bus publisher for `login.attempted` audit events (§4.5).
    pub event_bus: Arc<dyn EventBus>,
}

impl<U, H, G, Ca, R, M, T, Clk> AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>
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
    /// Assemble an environment from its providers.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        users: U,
        password_hasher: H,
        geo: G,
        cache: Ca,
        risk_scorer: R,
        mfa_arbiter: M,
        token_signer: T,
        clock: Clk,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self { users, password_hasher, geo, cache, risk_scorer, mfa_arbiter, token_signer, clock, event_bus }
    }
}
