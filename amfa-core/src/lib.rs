//! # AMFA Core
//!
//! Core traits and types for the adaptive multi-factor authentication backend.
//!
//! This crate provides the fundamental abstractions shared by the three
//! services (Authenticator, Risk Scorer, MFA Arbiter): a pure `Reducer` that
//! owns business logic, an `Effect` type describing the side effects a
//! reducer wants performed, and an `Event`/`EventBus` pair for the
//! asynchronous audit trail each service publishes to.
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use amfa_core::*;
//!
//! impl Reducer for LoginReducer {
//!     type State = AuthenticatorState;
//!     type Action = AuthenticatorAction;
//!     type Environment = AuthenticatorEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AuthenticatorState,
//!         action: AuthenticatorAction,
//!         env: &AuthenticatorEnvironment,
//!     ) -> SmallVec<[Effect<AuthenticatorAction>; 4]> {
//!         // Business logic goes here
//!         smallvec::smallvec![Effect::None]
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod effect;
pub mod environment;
pub mod event;
pub mod event_bus;
pub mod reducer;

pub use effect::Effect;
pub use environment::Clock;
pub use event::{Event, EventError, SerializedEvent};
pub use event_bus::{EventBus, EventBusError, EventStream};
pub use reducer::Reducer;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::effect::Effect;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Action1,
        Action2,
        Action3,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum MappedAction {
        Mapped(TestAction),
    }

    #[test]
    fn effect_merge_produces_parallel() {
        let merged = Effect::merge(vec![Effect::None, Effect::<TestAction>::None]);
        match merged {
            Effect::Parallel(effects) => assert_eq!(effects.len(), 2),
            _ => panic!("expected Parallel effect"),
        }
    }

    #[test]
    fn effect_chain_produces_sequential() {
        let chained = Effect::chain(vec![Effect::None, Effect::<TestAction>::None]);
        match chained {
            Effect::Sequential(effects) => assert_eq!(effects.len(), 2),
            _ => panic!("expected Sequential effect"),
        }
    }

    #[test]
    fn effect_map_none_stays_none() {
        let effect: Effect<TestAction> = Effect::None;
        let mapped: Effect<MappedAction> = effect.map(MappedAction::Mapped);
        assert!(matches!(mapped, Effect::None));
    }

    #[test]
    fn effect_map_delay_transforms_action() {
        let effect: Effect<TestAction> = Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(TestAction::Action1),
        };
        let mapped: Effect<MappedAction> = effect.map(MappedAction::Mapped);
        match mapped {
            Effect::Delay { duration, action } => {
                assert_eq!(duration, Duration::from_secs(1));
                assert_eq!(*action, MappedAction::Mapped(TestAction::Action1));
            },
            _ => panic!("expected Delay effect"),
        }
    }

    #[tokio::test]
    async fn effect_map_future_transforms_resolved_action() {
        let effect: Effect<TestAction> =
            Effect::Future(Box::pin(async { Some(TestAction::Action3) }));
        let mapped: Effect<MappedAction> = effect.map(MappedAction::Mapped);
        match mapped {
            Effect::Future(fut) => {
                assert_eq!(fut.await, Some(MappedAction::Mapped(TestAction::Action3)));
            },
            _ => panic!("expected Future effect"),
        }
    }

    #[test]
    fn effect_map_nested_preserves_structure() {
        let effect: Effect<TestAction> = Effect::Parallel(vec![
            Effect::Sequential(vec![
                Effect::Delay {
                    duration: Duration::from_millis(100),
                    action: Box::new(TestAction::Action1),
                },
                Effect::None,
            ]),
            Effect::Delay {
                duration: Duration::from_millis(200),
                action: Box::new(TestAction::Action2),
            },
        ]);

        let mapped: Effect<MappedAction> = effect.map(MappedAction::Mapped);
        match mapped {
            Effect::Parallel(effects) => {
                assert_eq!(effects.len(), 2);
                match &effects[0] {
                    Effect::Sequential(inner) => assert_eq!(inner.len(), 2),
                    _ => panic!("expected Sequential in Parallel"),
                }
            },
            _ => panic!("expected Parallel effect"),
        }
    }
}
