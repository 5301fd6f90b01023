//! # AMFA Testing
//!
//! Testing utilities shared by the authenticator, risk-scorer, and mfa-arbiter
//! services.
//!
//! This crate provides:
//! - Mock implementations of `amfa_core` environment traits (`FixedClock`,
//!   `InMemoryEventBus`)
//! - A fluent Given-When-Then harness for testing reducers in isolation
//! - Assertion helpers for the effects a reducer returns
//!
//! ## Example
//!
//! ```ignore
//! use amfa_testing::{ReducerTest, assertions};
//!
//! #[test]
//! fn login_with_wrong_password_increments_attempt_count() {
//!     ReducerTest::new(AuthenticatorReducer)
//!         .with_env(test_environment())
//!         .given_state(AuthenticatorState::default())
//!         .when_action(AuthenticatorAction::LoginAttempted { email, password })
//!         .then_state(|state| {
//!             assert_eq!(state.failed_attempts, 1);
//!         })
//!         .run();
//! }
//! ```

use amfa_core::environment::Clock;
use chrono::{DateTime, Utc};

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of `amfa_core` environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use amfa_core::event::SerializedEvent;
    use amfa_core::event_bus::{EventBus, EventBusError, EventStream};
    use futures::stream;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, so boundary rules (e.g. the odd-hour
    /// check) can be exercised exactly.
    ///
    /// # Example
    ///
    /// ```
    /// use amfa_testing::mocks::FixedClock;
    /// use amfa_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory [`EventBus`] that captures published events for assertions.
    ///
    /// Subscription is not supported (returns `SubscriptionFailed`) since no
    /// test in this codebase needs to consume the audit stream; it only needs
    /// to assert that a `login.attempted` / `risk.scored` / `mfa.completed`
    /// event was published.
    #[derive(Debug, Default)]
    pub struct InMemoryEventBus {
        published: Mutex<Vec<(String, SerializedEvent)>>,
    }

    impl InMemoryEventBus {
        /// Create an empty event bus.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Return a snapshot of every `(topic, event)` pair published so far.
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn published(&self) -> Vec<(String, SerializedEvent)> {
            self.published.lock().unwrap().clone()
        }

        /// Number of events published to a given topic.
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn count_for_topic(&self, topic: &str) -> usize {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| t == topic)
                .count()
        }
    }

    impl EventBus for InMemoryEventBus {
        fn publish(
            &self,
            topic: &str,
            event: &SerializedEvent,
        ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
            let topic = topic.to_string();
            let event = event.clone();
            Box::pin(async move {
                #[allow(clippy::unwrap_used)]
                self.published.lock().unwrap().push((topic, event));
                Ok(())
            })
        }

        fn subscribe(
            &self,
            topics: &[&str],
        ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
            let topics: Vec<String> = topics.iter().map(ToString::to_string).collect();
            Box::pin(async move {
                Err(EventBusError::SubscriptionFailed {
                    topics,
                    reason: "InMemoryEventBus does not support subscription".to_string(),
                })
            })
        }
    }

    /// Build an already-completed [`EventStream`] yielding nothing.
    ///
    /// Useful when a test needs `EventBus::subscribe` to succeed with an
    /// empty stream rather than erroring.
    #[must_use]
    pub fn empty_event_stream() -> EventStream {
        Box::pin(stream::empty())
    }
}

pub use mocks::{FixedClock, InMemoryEventBus, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use amfa_core::event::SerializedEvent;
    use amfa_core::event_bus::EventBus;
    use mocks::InMemoryEventBus;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[tokio::test]
    async fn in_memory_event_bus_records_publish() {
        let bus = InMemoryEventBus::new();
        let event = SerializedEvent::new("login.attempted".to_string(), vec![1, 2, 3], None);

        bus.publish("auth_events", &event).await.unwrap();

        assert_eq!(bus.count_for_topic("auth_events"), 1);
        assert_eq!(bus.published().len(), 1);
    }

    #[tokio::test]
    async fn in_memory_event_bus_subscribe_is_unsupported() {
        let bus = InMemoryEventBus::new();
        let result = bus.subscribe(&["auth_events"]).await;
        assert!(result.is_err());
    }
}
