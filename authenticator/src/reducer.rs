//! The authenticator's business logic.
//!
//! Each command action's effect performs its entire saga — password check,
//! geolocation, risk scoring, the MFA handshake — inside one future and
//! dispatches a single terminal `*Completed` action back. The reducer itself
//! stays a straight-line match: commands spawn an effect, completions write
//! `state.outcome` and stop.

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use uuid::Uuid;

use amfa_core::effect::Effect;
use amfa_core::environment::Clock;
use amfa_core::event::{Event, SerializedEvent};
use amfa_core::event_bus::EventBus;
use amfa_core::reducer::Reducer;

use crate::actions::{AuthenticatorAction, DeletionCounts, LoginOutcome};
use crate::constants::{cache_keys, durations};
use crate::environment::AuthenticatorEnvironment;
use crate::error::AuthenticatorError;
use crate::providers::{
    Cache, CheckRequest, Claims, GeoLocator, MfaArbiterClient, PasswordHasher, PredictRequest,
    RiskScorerClient, TokenSigner, UserRecord, UserRepository, VerifyRequest,
};
use crate::state::{AuthenticatorState, Outcome, Role, UserId};

const AUTH_EVENTS_TOPIC: &str = "auth_events";

/// `login.attempted` audit event (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginAttempted {
    event_id: Uuid,
    user_id: Option<UserId>,
    email: String,
    ip_address: IpAddr,
    was_successful: bool,
}

impl Event for LoginAttempted {
    fn event_type(&self) -> &'static str {
        "login.attempted"
    }
}

fn publish_login_attempted(
    event_bus: &Arc<dyn EventBus>,
    event_id: Uuid,
    user_id: Option<UserId>,
    email: &str,
    ip_address: IpAddr,
    was_successful: bool,
) {
    let event_bus = Arc::clone(event_bus);
    let event = LoginAttempted { event_id, user_id, email: email.to_string(), ip_address, was_successful };
    tokio::spawn(async move {
        if let Ok(serialized) = SerializedEvent::from_event(&event, None) {
            let _ = event_bus.publish(AUTH_EVENTS_TOPIC, &serialized).await;
        }
    });
}

/// Business logic for every authenticator endpoint (§4.1).
///
/// Generic over the same provider set as [`AuthenticatorEnvironment`]; a
/// zero-sized type, since all of its state lives in the injected environment.
pub struct AuthenticatorReducer<U, H, G, Ca, R, M, T, Clk> {
    _marker: std::marker::PhantomData<(U, H, G, Ca, R, M, T, Clk)>,
}

impl<U, H, G, Ca, R, M, T, Clk> Default for AuthenticatorReducer<U, H, G, Ca, R, M, T, Clk> {
    fn default() -> Self {
        Self { _marker: std::marker::PhantomData }
    }
}

impl<U, H, G, Ca, R, M, T, Clk> Clone for AuthenticatorReducer<U, H, G, Ca, R, M, T, Clk> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<U, H, G, Ca, R, M, T, Clk> AuthenticatorReducer<U, H, G, Ca, R, M, T, Clk> {
    /// Construct a new reducer. Stateless; exists only to carry the
    /// environment's type parameters through to `Reducer`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<U, H, G, Ca, R, M, T, Clk> Reducer for AuthenticatorReducer<U, H, G, Ca, R, M, T, Clk>
where
    U: UserRepository + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    G: GeoLocator + Clone + 'static,
    Ca: Cache + Clone + 'static,
    R: RiskScorerClient + Clone + 'static,
    M: MfaArbiterClient + Clone + 'static,
    T: TokenSigner + Clone + 'static,
    Clk: Clock + Clone + 'static,
{
    type State = AuthenticatorState;
    type Action = AuthenticatorAction;
    type Environment = AuthenticatorEnvironment<U, H, G, Ca, R, M, T, Clk>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthenticatorAction::Register { email, password } => {
                let users = env.users.clone();
                let hasher = env.password_hasher.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let password_hash = hasher.hash(&password).await?;
                        let user = UserRecord {
                            user_id: UserId::new(),
                            email,
                            password_hash,
                            srp_salt: None,
                            srp_verifier: None,
                            created_at: chrono::Utc::now(),
                            role: Role::User,
                        };
                        users.create(user).await
                    }
                    .await;
                    Some(AuthenticatorAction::RegisterCompleted(result.map(|u| u.user_id)))
                }))]
            }
            AuthenticatorAction::RegisterCompleted(result) => {
                state.outcome = match result {
                    Ok(user_id) => Outcome::Registered { user_id },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::Login { email, password, device_id, client_ip, user_agent } => {
                let users = env.users.clone();
                let hasher = env.password_hasher.clone();
                let geo = env.geo.clone();
                let cache = env.cache.clone();
                let risk_scorer = env.risk_scorer.clone();
                let mfa_arbiter = env.mfa_arbiter.clone();
                let token_signer = env.token_signer.clone();
                let clock = env.clock.clone();
                let event_bus = Arc::clone(&env.event_bus);

                smallvec![Effect::Future(Box::pin(async move {
                    let event_id = Uuid::new_v4();
                    let geo_info = geo.locate(client_ip).await.unwrap_or_else(|_| crate::providers::GeoInfo::unknown());

                    let user = match users.get_by_email(&email).await {
                        Ok(user) => user,
                        Err(_) => {
                            publish_login_attempted(&event_bus, event_id, None, &email, client_ip, false);
                            return Some(AuthenticatorAction::LoginCompleted(Err(AuthenticatorError::InvalidCredentials)));
                        }
                    };

                    let password_ok = hasher.verify(&password, &user.password_hash).await.unwrap_or(false);
                    if !password_ok {
                        publish_login_attempted(&event_bus, event_id, Some(user.user_id), &email, client_ip, false);
                        return Some(AuthenticatorAction::LoginCompleted(Err(AuthenticatorError::InvalidCredentials)));
                    }

                    let predict_request = PredictRequest {
                        event_id,
                        user_id: Some(user.user_id),
                        email: email.clone(),
                        ip_address: client_ip,
                        user_agent: user_agent.clone(),
                        geo: geo_info,
                        was_successful: true,
                    };
                    let predicted = match risk_scorer.predict(predict_request).await {
                        Ok(p) => p,
                        Err(e) => {
                            publish_login_attempted(&event_bus, event_id, Some(user.user_id), &email, client_ip, true);
                            return Some(AuthenticatorAction::LoginCompleted(Err(e)));
                        }
                    };

                    let check_request = CheckRequest {
                        event_id,
                        user_id: user.user_id,
                        email: email.clone(),
                        device_id,
                        risk_score: predicted.data.risk_score,
                    };
                    let checked = match mfa_arbiter.check(check_request).await {
                        Ok(c) => c,
                        Err(e) => {
                            publish_login_attempted(&event_bus, event_id, Some(user.user_id), &email, client_ip, true);
                            return Some(AuthenticatorAction::LoginCompleted(Err(e)));
                        }
                    };

                    publish_login_attempted(&event_bus, event_id, Some(user.user_id), &email, client_ip, true);

                    if checked.data.mfa_required {
                        let _ = cache
                            .set(&cache_keys::pending_mfa(&email), &event_id.to_string(), durations::PENDING_MFA_TTL)
                            .await;
                        return Some(AuthenticatorAction::LoginCompleted(Ok(LoginOutcome::MfaRequired(event_id))));
                    }

                    let token = mint_credential(&token_signer, &clock, &email, false).await;
                    Some(AuthenticatorAction::LoginCompleted(token.map(LoginOutcome::Credential)))
                }))]
            }
            AuthenticatorAction::LoginCompleted(result) => {
                state.outcome = match result {
                    Ok(LoginOutcome::Credential(token)) => Outcome::LoggedIn { token },
                    Ok(LoginOutcome::MfaRequired(event_id)) => Outcome::MfaRequired { event_id },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::VerifyOtp { email, device_id, user_agent, ip_address, otp } => {
                let users = env.users.clone();
                let cache = env.cache.clone();
                let mfa_arbiter = env.mfa_arbiter.clone();
                let token_signer = env.token_signer.clone();
                let clock = env.clock.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let Some(event_id_str) = cache.get(&cache_keys::pending_mfa(&email)).await? else {
                            return Err(AuthenticatorError::NoPendingChallenge);
                        };
                        let event_id = event_id_str.parse::<Uuid>().map_err(|_| AuthenticatorError::NoPendingChallenge)?;

                        let user = users.get_by_email(&email).await?;

                        let verified = mfa_arbiter
                            .verify(VerifyRequest {
                                event_id,
                                user_id: user.user_id,
                                email: email.clone(),
                                device_id,
                                user_agent,
                                ip_address,
                                otp,
                            })
                            .await?;
                        let _ = verified.device_saved;

                        cache.delete(&cache_keys::pending_mfa(&email)).await.ok();
                        mint_credential(&token_signer, &clock, &email, true).await
                    }
                    .await;
                    Some(AuthenticatorAction::VerifyOtpCompleted(result))
                }))]
            }
            AuthenticatorAction::VerifyOtpCompleted(result) => {
                state.outcome = match result {
                    Ok(token) => Outcome::OtpVerified { token },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::Logout { token } => {
                let cache = env.cache.clone();
                let token_signer = env.token_signer.clone();
                let clock = env.clock.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let claims = token_signer.verify(&token).await?;
                        let remaining = (claims.exp - clock.now().timestamp()).max(1);
                        cache
                            .set(&cache_keys::blacklist(&token), "blacklisted", std::time::Duration::from_secs(remaining as u64))
                            .await
                    }
                    .await;
                    Some(AuthenticatorAction::LogoutCompleted(result))
                }))]
            }
            AuthenticatorAction::LogoutCompleted(result) => {
                state.outcome = match result {
                    Ok(()) => Outcome::LoggedOut,
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::CurrentUser { token } => {
                let cache = env.cache.clone();
                let token_signer = env.token_signer.clone();
                let users = env.users.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        if cache.get(&cache_keys::blacklist(&token)).await?.is_some() {
                            return Err(AuthenticatorError::TokenRevoked);
                        }
                        let claims = token_signer.verify(&token).await?;
                        let user = users.get_by_email(&claims.sub).await?;
                        Ok((user.email, user.role))
                    }
                    .await;
                    Some(AuthenticatorAction::CurrentUserCompleted(result))
                }))]
            }
            AuthenticatorAction::CurrentUserCompleted(result) => {
                state.outcome = match result {
                    Ok((email, role)) => Outcome::CurrentUser { email, role },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::ChangePassword { email, new_password, confirm_password } => {
                let users = env.users.clone();
                let hasher = env.password_hasher.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        if new_password != confirm_password {
                            return Err(AuthenticatorError::PasswordConfirmationMismatch);
                        }
                        let user = users.get_by_email(&email).await?;
                        let password_hash = hasher.hash(&new_password).await?;
                        users.update_password(user.user_id, &password_hash).await
                    }
                    .await;
                    Some(AuthenticatorAction::ChangePasswordCompleted(result))
                }))]
            }
            AuthenticatorAction::ChangePasswordCompleted(result) => {
                state.outcome = match result {
                    Ok(()) => Outcome::PasswordChanged,
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            AuthenticatorAction::DeleteUser { email } => {
                let users = env.users.clone();
                let mfa_arbiter = env.mfa_arbiter.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let user = users.get_by_email(&email).await?;
                        let devices_removed = mfa_arbiter.delete_trusted_devices(user.user_id).await?;
                        let otp_logs_removed = mfa_arbiter.delete_otp_logs(&email).await?;
                        users.delete(user.user_id).await?;
                        Ok(DeletionCounts { devices_removed, otp_logs_removed })
                    }
                    .await;
                    Some(AuthenticatorAction::DeleteUserCompleted(result))
                }))]
            }
            AuthenticatorAction::DeleteUserCompleted(result) => {
                state.outcome = match result {
                    Ok(counts) => {
                        Outcome::UserDeleted { devices_removed: counts.devices_removed, otp_logs_removed: counts.otp_logs_removed }
                    }
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }
        }
    }
}

async fn mint_credential<T: TokenSigner, Clk: Clock>(
    token_signer: &T,
    clock: &Clk,
    email: &str,
    mfa: bool,
) -> crate::error::Result<String> {
    let now = clock.now();
    let exp = now + chrono::Duration::from_std(durations::CREDENTIAL_TTL).unwrap_or(chrono::Duration::hours(1));
    let claims = Claims { sub: email.to_string(), iat: now.timestamp(), exp: exp.timestamp(), mfa };
    token_signer.sign(&claims).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use amfa_testing::mocks::{test_clock, InMemoryEventBus};

    use super::*;
    use crate::mocks::{
        MockCache, MockGeoLocator, MockMfaArbiterClient, MockPasswordHasher, MockRiskScorerClient,
        MockTokenSigner, MockUserRepository,
    };

    type TestReducer = AuthenticatorReducer<
        MockUserRepository,
        MockPasswordHasher,
        MockGeoLocator,
        MockCache,
        MockRiskScorerClient,
        MockMfaArbiterClient,
        MockTokenSigner,
        amfa_testing::mocks::FixedClock,
    >;

    type TestEnvironment = AuthenticatorEnvironment<
        MockUserRepository,
        MockPasswordHasher,
        MockGeoLocator,
        MockCache,
        MockRiskScorerClient,
        MockMfaArbiterClient,
        MockTokenSigner,
        amfa_testing::mocks::FixedClock,
    >;

    fn seeded_user(email: &str, password: &str) -> (MockUserRepository, UserId) {
        let users = MockUserRepository::new();
        let user_id = UserId::new();
        users.seed(UserRecord {
            user_id,
            email: email.to_string(),
            password_hash: format!("mock:{password}"),
            srp_salt: None,
            srp_verifier: None,
            created_at: chrono::Utc::now(),
            role: Role::User,
        });
        (users, user_id)
    }

    fn environment(users: MockUserRepository, mfa_required: bool, risk_score: u8) -> TestEnvironment {
        AuthenticatorEnvironment::new(
            users,
            MockPasswordHasher,
            MockGeoLocator::default(),
            MockCache::new(),
            MockRiskScorerClient::new(risk_score),
            MockMfaArbiterClient::new(mfa_required, Ok(false)),
            MockTokenSigner,
            test_clock(),
            Arc::new(InMemoryEventBus::new()),
        )
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let (users, _) = seeded_user("a@example.com", "correct-password");
        let env = environment(users, false, 10);
        let reducer = TestReducer::new();
        let mut state = AuthenticatorState::default();

        let effects = reducer.reduce(
            &mut state,
            AuthenticatorAction::Login {
                email: "a@example.com".to_string(),
                password: "wrong-password".to_string(),
                device_id: "device-1".to_string(),
                client_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                user_agent: "test-agent".to_string(),
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert_eq!(state.outcome, Outcome::Failed(AuthenticatorError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_without_challenge_mints_a_credential() {
        let (users, _) = seeded_user("b@example.com", "correct-password");
        let env = environment(users, false, 10);
        let reducer = TestReducer::new();
        let mut state = AuthenticatorState::default();

        let effects = reducer.reduce(
            &mut state,
            AuthenticatorAction::Login {
                email: "b@example.com".to_string(),
                password: "correct-password".to_string(),
                device_id: "device-1".to_string(),
                client_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                user_agent: "test-agent".to_string(),
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert!(matches!(state.outcome, Outcome::LoggedIn { .. }));
    }

    #[tokio::test]
    async fn login_with_risk_requires_mfa() {
        let (users, _) = seeded_user("c@example.com", "correct-password");
        let env = environment(users, true, 90);
        let reducer = TestReducer::new();
        let mut state = AuthenticatorState::default();

        let effects = reducer.reduce(
            &mut state,
            AuthenticatorAction::Login {
                email: "c@example.com".to_string(),
                password: "correct-password".to_string(),
                device_id: "device-1".to_string(),
                client_ip: IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
                user_agent: "test-agent".to_string(),
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert!(matches!(state.outcome, Outcome::MfaRequired { .. }));
    }
}
