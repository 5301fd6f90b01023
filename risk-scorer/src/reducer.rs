//! The risk scorer's business logic.
//!
//! `/predict` is idempotent by `event_id`: a repeat call short-circuits on
//! the stored row before the scoring algorithm ever runs. Otherwise the
//! effect scores against history, persists, and publishes `risk.scored`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use uuid::Uuid;

use amfa_core::effect::Effect;
use amfa_core::environment::Clock;
use amfa_core::event::{Event, SerializedEvent};
use amfa_core::event_bus::EventBus;
use amfa_core::reducer::Reducer;

use crate::actions::{PredictOutcome, RiskScorerAction};
use crate::environment::RiskScorerEnvironment;
use crate::providers::{LoginAttempt, LoginHistoryRepository, MfaLogClient};
use crate::scoring;
use crate::state::{Outcome, RiskScorerState};

const RISK_EVENTS_TOPIC: &str = "risk_events";

/// `risk.scored` audit event (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RiskScored {
    event_id: Uuid,
    email: String,
    risk_score: u8,
    was_successful: bool,
}

impl Event for RiskScored {
    fn event_type(&self) -> &'static str {
        "risk.scored"
    }
}

fn publish_risk_scored(event_bus: &Arc<dyn EventBus>, event_id: Uuid, email: &str, risk_score: u8, was_successful: bool) {
    let event_bus = Arc::clone(event_bus);
    let event = RiskScored { event_id, email: email.to_string(), risk_score, was_successful };
    tokio::spawn(async move {
        if let Ok(serialized) = SerializedEvent::from_event(&event, None) {
            let _ = event_bus.publish(RISK_EVENTS_TOPIC, &serialized).await;
        }
    });
}

/// Business logic for `/predict` (§4.2).
///
/// Generic over the same provider set as [`RiskScorerEnvironment`]; a
/// zero-sized type, since all of its state lives in the injected
/// environment.
pub struct RiskScorerReducer<Repo, Mfa, Clk> {
    _marker: std::marker::PhantomData<(Repo, Mfa, Clk)>,
}

impl<Repo, Mfa, Clk> Default for RiskScorerReducer<Repo, Mfa, Clk> {
    fn default() -> Self {
        Self { _marker: std::marker::PhantomData }
    }
}

impl<Repo, Mfa, Clk> Clone for RiskScorerReducer<Repo, Mfa, Clk> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<Repo, Mfa, Clk> RiskScorerReducer<Repo, Mfa, Clk> {
    /// Construct a new reducer. Stateless; exists only to carry the
    /// environment's type parameters through to `Reducer`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Repo, Mfa, Clk> Reducer for RiskScorerReducer<Repo, Mfa, Clk>
where
    Repo: LoginHistoryRepository + Clone + 'static,
    Mfa: MfaLogClient + Clone + 'static,
    Clk: Clock + Clone + 'static,
{
    type State = RiskScorerState;
    type Action = RiskScorerAction;
    type Environment = RiskScorerEnvironment<Repo, Mfa, Clk>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RiskScorerAction::Predict { request } => {
                let history_repo = env.history.clone();
                let mfa_logs = env.mfa_logs.clone();
                let clock = env.clock.clone();
                let cache = env.verification_cache.clone();
                let event_bus = Arc::clone(&env.event_bus);

                smallvec![Effect::Future(Box::pin(async move {
                    let result = async {
                        if let Some(existing) = history_repo.find(request.event_id).await? {
                            return Ok(PredictOutcome {
                                event_id: existing.event_id,
                                risk_score: existing.risk_score,
                                persisted: false,
                            });
                        }

                        let history = history_repo.history_for_email(&request.email).await?;
                        let now = clock.now();
                        let risk_score = scoring::score(&request, &history, now, &mfa_logs, &cache).await;

                        let attempt = LoginAttempt {
                            event_id: request.event_id,
                            user_id: request.user_id,
                            email: request.email.clone(),
                            ip_address: request.ip_address,
                            user_agent: request.user_agent.clone(),
                            country: request.geo.country.clone(),
                            region: request.geo.region.clone(),
                            city: request.geo.city.clone(),
                            timestamp: now,
                            was_successful: request.was_successful,
                            risk_score,
                        };

                        let persisted = history_repo.insert(attempt).await?;
                        let risk_score = if persisted {
                            risk_score
                        } else {
                            history_repo
                                .find(request.event_id)
                                .await?
                                .map_or(risk_score, |row| row.risk_score)
                        };

                        publish_risk_scored(&event_bus, request.event_id, &request.email, risk_score, request.was_successful);

                        Ok(PredictOutcome { event_id: request.event_id, risk_score, persisted })
                    }
                    .await;
                    Some(RiskScorerAction::PredictCompleted(result))
                }))]
            }
            RiskScorerAction::PredictCompleted(result) => {
                state.outcome = match result {
                    Ok(outcome) => {
                        Outcome::Scored { event_id: outcome.event_id, risk_score: outcome.risk_score, persisted: outcome.persisted }
                    }
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
    use amfa_testing::mocks::{test_clock, InMemoryEventBus};

    use super::*;
    use crate::providers::{GeoInfo, OtpLogSummary, PredictRequest};

    #[derive(Clone, Default)]
    struct InMemoryHistory {
        rows: std::sync::Arc<std::sync::Mutex<Vec<LoginAttempt>>>,
    }

    impl LoginHistoryRepository for InMemoryHistory {
        async fn find(&self, event_id: Uuid) -> crate::error::Result<Option<LoginAttempt>> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.event_id == event_id).cloned())
        }

        async fn history_for_email(&self, email: &str) -> crate::error::Result<Vec<LoginAttempt>> {
            let mut rows: Vec<_> = self.rows.lock().unwrap().iter().filter(|r| r.email == email).cloned().collect();
            rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(rows)
        }

        async fn insert(&self, attempt: LoginAttempt) -> crate::error::Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.event_id == attempt.event_id) {
                return Ok(false);
            }
            rows.push(attempt);
            Ok(true)
        }
    }

    #[derive(Clone)]
    struct NoChallengesIssued;

    impl MfaLogClient for NoChallengesIssued {
        async fn otp_logs(&self, _event_id: Uuid) -> crate::error::Result<Option<OtpLogSummary>> {
            Ok(None)
        }
    }

    type TestReducer = RiskScorerReducer<InMemoryHistory, NoChallengesIssued, amfa_testing::mocks::FixedClock>;
    type TestEnvironment = RiskScorerEnvironment<InMemoryHistory, NoChallengesIssued, amfa_testing::mocks::FixedClock>;

    fn environment() -> TestEnvironment {
        RiskScorerEnvironment::new(InMemoryHistory::default(), NoChallengesIssued, test_clock(), Arc::new(InMemoryEventBus::new()))
    }

    fn request() -> PredictRequest {
        PredictRequest {
            event_id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            email: "a@example.com".to_string(),
            ip_address: "1.2.3.4".parse().unwrap(),
            user_agent: "agent-1".to_string(),
            geo: GeoInfo { country: "Local".to_string(), region: None, city: None },
            was_successful: true,
        }
    }

    #[tokio::test]
    async fn first_predict_persists_and_scores() {
        let env = environment();
        let reducer = TestReducer::new();
        let mut state = RiskScorerState::default();

        let effects = reducer.reduce(&mut state, RiskScorerAction::Predict { request: request() }, &env);
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut state, completed, &env);

        let Outcome::Scored { risk_score, persisted, .. } = state.outcome else { panic!("expected Scored") };
        assert_eq!(risk_score, 50);
        assert!(persisted);
    }

    #[tokio::test]
    async fn repeat_event_id_is_idempotent() {
        let env = environment();
        let reducer = TestReducer::new();
        let req = request();

        let mut first_state = RiskScorerState::default();
        let effects = reducer.reduce(&mut first_state, RiskScorerAction::Predict { request: req.clone() }, &env);
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut first_state, completed, &env);

        let mut second_state = RiskScorerState::default();
        let effects = reducer.reduce(&mut second_state, RiskScorerAction::Predict { request: req }, &env);
        let Effect::Future(fut) = effects.into_iter().next().unwrap() else { panic!("expected a future effect") };
        let completed = fut.await.unwrap();
        reducer.reduce(&mut second_state, completed, &env);

        let Outcome::Scored { persisted, .. } = second_state.outcome else { panic!("expected Scored") };
        assert!(!persisted);
    }
}
