//! The MFA arbiter's business logic.
//!
//! Each command action's effect performs its entire saga — trust lookup,
//! OTP generation and dispatch, or code verification — inside one future
//! and dispatches a single terminal `*Completed` action back. The reducer
//! itself stays a straight-line match: commands spawn an effect, completions
//! write `state.outcome` and stop.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use uuid::Uuid;

use amfa_core::effect::Effect;
use amfa_core::environment::Clock;
use amfa_core::event::{Event, SerializedEvent};
use amfa_core::event_bus::EventBus;
use amfa_core::reducer::Reducer;

use crate::actions::{CheckOutcome, MfaArbiterAction};
use crate::constants::{cache_keys, durations, OTP_DIGITS};
use crate::environment::MfaArbiterEnvironment;
use crate::error::MfaArbiterError;
use crate::providers::{Cache, EmailTransport, OtpChallenge, OtpLogEntry, OtpLogRepository, OtpLogStatus, TrustedDevice, TrustedDeviceRepository};
use crate::state::{MfaArbiterState, Outcome};

const MFA_EVENTS_TOPIC: &str = "mfa_events";

/// `mfa.completed` audit event (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MfaCompleted {
    event_id: Uuid,
    user_id: Uuid,
    email: String,
    was_successful: bool,
}

impl Event for MfaCompleted {
    fn event_type(&self) -> &'static str {
        "mfa.completed"
    }
}

fn publish_mfa_completed(event_bus: &Arc<dyn EventBus>, event_id: Uuid, user_id: Uuid, email: &str, was_successful: bool) {
    let event_bus = Arc::clone(event_bus);
    let event = MfaCompleted { event_id, user_id, email: email.to_string(), was_successful };
    tokio::spawn(async move {
        if let Ok(serialized) = SerializedEvent::from_event(&event, None) {
            let _ = event_bus.publish(MFA_EVENTS_TOPIC, &serialized).await;
        }
    });
}

fn generate_otp() -> String {
    let upper_bound = 10u32.pow(OTP_DIGITS);
    let value = rand::thread_rng().gen_range(0..upper_bound);
    format!("{value:0width$}", width = OTP_DIGITS as usize)
}

/// Business logic for every MFA arbiter endpoint (§4.3).
///
/// Generic over the same provider set as [`MfaArbiterEnvironment`]; a
/// zero-sized type, since all of its state lives in the injected environment.
pub struct MfaArbiterReducer<Dev, Log, Ca, Em, Clk> {
    _marker: std::marker::PhantomData<(Dev, Log, Ca, Em, Clk)>,
}

impl<Dev, Log, Ca, Em, Clk> Default for MfaArbiterReducer<Dev, Log, Ca, Em, Clk> {
    fn default() -> Self {
        Self { _marker: std::marker::PhantomData }
    }
}

impl<Dev, Log, Ca, Em, Clk> Clone for MfaArbiterReducer<Dev, Log, Ca, Em, Clk> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<Dev, Log, Ca, Em, Clk> MfaArbiterReducer<Dev, Log, Ca, Em, Clk> {
    /// Construct a new reducer. Stateless; exists only to carry the
    /// environment's type parameters through to `Reducer`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Dev, Log, Ca, Em, Clk> Reducer for MfaArbiterReducer<Dev, Log, Ca, Em, Clk>
where
    Dev: TrustedDeviceRepository + Clone + 'static,
    Log: OtpLogRepository + Clone + 'static,
    Ca: Cache + Clone + 'static,
    Em: EmailTransport + Clone + 'static,
    Clk: Clock + Clone + 'static,
{
    type State = MfaArbiterState;
    type Action = MfaArbiterAction;
    type Environment = MfaArbiterEnvironment<Dev, Log, Ca, Em, Clk>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            MfaArbiterAction::Check { event_id, user_id, email, device_id, risk_score } => {
                let devices = env.devices.clone();
                let logs = env.logs.clone();
                let cache = env.cache.clone();
                let email_transport = env.email.clone();
                let clock = env.clock.clone();
                let risk_threshold = env.risk_threshold;

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let hint_key = cache_keys::trusted_hint(user_id, &device_id);
                        if cache.get(&hint_key).await?.is_some() {
                            return Ok(CheckOutcome { event_id, mfa_required: false });
                        }

                        let now = clock.now();
                        if let Some(device) = devices.find_active(user_id, &device_id, now).await? {
                            let remaining = (device.expires_at - now).to_std().unwrap_or(durations::TRUSTED_DEVICE_TTL);
                            let _ = cache.set(&hint_key, "true", remaining).await;
                            return Ok(CheckOutcome { event_id, mfa_required: false });
                        }

                        if risk_score < risk_threshold {
                            return Ok(CheckOutcome { event_id, mfa_required: false });
                        }

                        let otp = generate_otp();
                        if let Err(e) = email_transport.send_otp(&email, &otp).await {
                            logs.append(OtpLogEntry {
                                event_id,
                                email: email.clone(),
                                status: OtpLogStatus::FailedSend,
                                error: Some(e.to_string()),
                                timestamp: now,
                            })
                            .await?;
                            return Err(e);
                        }

                        let challenge = OtpChallenge { otp, event_id, device_id: device_id.clone() };
                        let serialized = serde_json::to_string(&challenge)
                            .map_err(|e| MfaArbiterError::Internal(format!("failed to serialize challenge: {e}")))?;
                        cache.set(&cache_keys::otp_challenge(&email), &serialized, durations::OTP_TTL).await?;

                        logs.append(OtpLogEntry { event_id, email: email.clone(), status: OtpLogStatus::Sent, error: None, timestamp: now })
                            .await?;

                        Ok(CheckOutcome { event_id, mfa_required: true })
                    }
                    .await;
                    Some(MfaArbiterAction::CheckCompleted(result))
                }))]
            }
            MfaArbiterAction::CheckCompleted(result) => {
                state.outcome = match result {
                    Ok(outcome) => Outcome::CheckResolved { event_id: outcome.event_id, mfa_required: outcome.mfa_required },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            MfaArbiterAction::Verify { event_id, user_id, email, device_id, user_agent, ip_address, otp } => {
                let devices = env.devices.clone();
                let logs = env.logs.clone();
                let cache = env.cache.clone();
                let clock = env.clock.clone();
                let event_bus = Arc::clone(&env.event_bus);

                smallvec![Effect::Future(Box::pin(async move {
                    let result: Result<bool, MfaArbiterError> = async {
                        let challenge_key = cache_keys::otp_challenge(&email);
                        let Some(stored) = cache.get(&challenge_key).await? else {
                            logs.append(OtpLogEntry {
                                event_id,
                                email: email.clone(),
                                status: OtpLogStatus::NotFound,
                                error: None,
                                timestamp: clock.now(),
                            })
                            .await?;
                            return Err(MfaArbiterError::NoPendingChallenge);
                        };
                        let challenge: OtpChallenge = serde_json::from_str(&stored)
                            .map_err(|e| MfaArbiterError::Internal(format!("corrupt cached challenge: {e}")))?;

                        let mismatch = if challenge.event_id != event_id {
                            Some(MfaArbiterError::EventMismatch)
                        } else if challenge.otp != otp {
                            Some(MfaArbiterError::OtpInvalid)
                        } else if challenge.device_id != device_id {
                            Some(MfaArbiterError::DeviceMismatch)
                        } else {
                            None
                        };

                        if let Some(err) = mismatch {
                            cache.delete(&challenge_key).await.ok();
                            logs.append(OtpLogEntry {
                                event_id,
                                email: email.clone(),
                                status: OtpLogStatus::Invalid,
                                error: Some(err.to_string()),
                                timestamp: clock.now(),
                            })
                            .await?;
                            return Err(err);
                        }

                        let now = clock.now();
                        let expires_at = now + chrono::Duration::from_std(durations::TRUSTED_DEVICE_TTL).unwrap_or(chrono::Duration::days(30));
                        devices
                            .upsert(TrustedDevice {
                                user_id,
                                device_id: device_id.clone(),
                                user_agent,
                                ip_address,
                                created_at: now,
                                expires_at,
                            })
                            .await?;
                        let _ = cache.set(&cache_keys::trusted_hint(user_id, &device_id), "true", durations::TRUSTED_DEVICE_TTL).await;
                        cache.delete(&challenge_key).await.ok();

                        logs.append(OtpLogEntry { event_id, email: email.clone(), status: OtpLogStatus::Verified, error: None, timestamp: now })
                            .await?;

                        Ok(true)
                    }
                    .await;

                    publish_mfa_completed(&event_bus, event_id, user_id, &email, result.is_ok());
                    Some(MfaArbiterAction::VerifyCompleted(result))
                }))]
            }
            MfaArbiterAction::VerifyCompleted(result) => {
                state.outcome = match result {
                    Ok(device_saved) => Outcome::Verified { device_saved },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            MfaArbiterAction::GetOtpLogs { event_id } => {
                let logs = env.logs.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let result = logs.for_event(event_id).await;
                    Some(MfaArbiterAction::GetOtpLogsCompleted(result))
                }))]
            }
            MfaArbiterAction::GetOtpLogsCompleted(result) => {
                state.outcome = match result {
                    Ok(entries) if entries.is_empty() => Outcome::NoOtpLogs,
                    Ok(entries) => {
                        let sent_logs_count = entries.iter().filter(|e| e.status == OtpLogStatus::Sent).count() as u32;
                        let verified_logs_count = entries.iter().filter(|e| e.status == OtpLogStatus::Verified).count() as u32;
                        Outcome::OtpLogs { sent_logs_count, verified_logs_count, logs: entries }
                    }
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            MfaArbiterAction::DeleteTrustedDevices { user_id } => {
                let devices = env.devices.clone();
                let cache = env.cache.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        let rows_removed = devices.delete_for_user(user_id).await?;
                        cache.delete_prefix(&cache_keys::trusted_hint_prefix(user_id)).await?;
                        Ok(rows_removed)
                    }
                    .await;
                    Some(MfaArbiterAction::DeleteTrustedDevicesCompleted(result))
                }))]
            }
            MfaArbiterAction::DeleteTrustedDevicesCompleted(result) => {
                state.outcome = match result {
                    Ok(rows_removed) => Outcome::RowsRemoved { rows_removed },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }

            MfaArbiterAction::DeleteOtpLogs { email } => {
                let logs = env.logs.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let result = logs.delete_for_email(&email).await;
                    Some(MfaArbiterAction::DeleteOtpLogsCompleted(result))
                }))]
            }
            MfaArbiterAction::DeleteOtpLogsCompleted(result) => {
                state.outcome = match result {
                    Ok(rows_removed) => Outcome::RowsRemoved { rows_removed },
                    Err(e) => Outcome::Failed(e),
                };
                smallvec![Effect::None]
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use amfa_testing::mocks::{test_clock, InMemoryEventBus};

    use super::*;
    use crate::mocks::{InMemoryOtpLogRepository, InMemoryTrustedDeviceRepository, MockCache, MockEmailTransport};

    type TestReducer = MfaArbiterReducer<InMemoryTrustedDeviceRepository, InMemoryOtpLogRepository, MockCache, MockEmailTransport, amfa_testing::mocks::FixedClock>;
    type TestEnvironment =
        MfaArbiterEnvironment<InMemoryTrustedDeviceRepository, InMemoryOtpLogRepository, MockCache, MockEmailTransport, amfa_testing::mocks::FixedClock>;

    fn environment(email_ok: bool, risk_threshold: u8) -> TestEnvironment {
        MfaArbiterEnvironment::new(
            InMemoryTrustedDeviceRepository::new(),
            InMemoryOtpLogRepository::new(),
            MockCache::new(),
            MockEmailTransport::new(email_ok),
            test_clock(),
            Arc::new(InMemoryEventBus::new()),
            risk_threshold,
        )
    }

    #[tokio::test]
    async fn low_risk_check_does_not_require_mfa() {
        let env = environment(true, 50);
        let reducer = TestReducer::new();
        let mut state = MfaArbiterState::default();

        let event_id = Uuid::new_v4();
        let effects = reducer.reduce(
            &mut state,
            MfaArbiterAction::Check {
                event_id,
                user_id: Uuid::new_v4(),
                email: "a@example.com".to_string(),
                device_id: "device-1".to_string(),
                risk_score: 10,
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert_eq!(state.outcome, Outcome::CheckResolved { event_id, mfa_required: false });
    }

    #[tokio::test]
    async fn high_risk_check_issues_a_challenge_and_verify_accepts_it() {
        let env = environment(true, 50);
        let reducer = TestReducer::new();
        let mut state = MfaArbiterState::default();
        let event_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let effects = reducer.reduce(
            &mut state,
            MfaArbiterAction::Check {
                event_id,
                user_id,
                email: "b@example.com".to_string(),
                device_id: "device-1".to_string(),
                risk_score: 90,
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert_eq!(state.outcome, Outcome::CheckResolved { event_id, mfa_required: true });

        let stored = env.cache.get(&cache_keys::otp_challenge("b@example.com")).await.unwrap().unwrap();
        let challenge: OtpChallenge = serde_json::from_str(&stored).unwrap();

        let effects = reducer.reduce(
            &mut state,
            MfaArbiterAction::Verify {
                event_id,
                user_id,
                email: "b@example.com".to_string(),
                device_id: "device-1".to_string(),
                user_agent: "test-agent".to_string(),
                ip_address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                otp: challenge.otp,
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert_eq!(state.outcome, Outcome::Verified { device_saved: true });
    }

    #[tokio::test]
    async fn verify_with_wrong_code_fails_closed() {
        let env = environment(true, 50);
        let reducer = TestReducer::new();
        let mut state = MfaArbiterState::default();
        let event_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let effects = reducer.reduce(
            &mut state,
            MfaArbiterAction::Check {
                event_id,
                user_id,
                email: "c@example.com".to_string(),
                device_id: "device-1".to_string(),
                risk_score: 90,
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);

        let effects = reducer.reduce(
            &mut state,
            MfaArbiterAction::Verify {
                event_id,
                user_id,
                email: "c@example.com".to_string(),
                device_id: "device-1".to_string(),
                user_agent: "test-agent".to_string(),
                ip_address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                otp: "000000".to_string(),
            },
            &env,
        );
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);
        assert_eq!(state.outcome, Outcome::Failed(MfaArbiterError::OtpInvalid));

        assert!(env.cache.get(&cache_keys::otp_challenge("c@example.com")).await.unwrap().is_none());
    }
}
