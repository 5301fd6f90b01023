//! The `Reducer` trait — the core abstraction for business logic.
//!
//! Reducers are pure functions: `(&mut State, Action, &Environment) ->
//! effects`. They contain all decision logic (password verification, risk
//! scoring, the OTP state machine) and are deterministic and testable without
//! touching a database, cache, or broker.

use crate::effect::Effect;
use smallvec::SmallVec;

/// Core trait for business logic shared by every service's reducer.
///
/// # Type Parameters
///
/// - `State`: the domain state this reducer operates on.
/// - `Action`: the action type this reducer processes.
/// - `Environment`: injected dependencies (providers) this reducer needs.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State;

    /// The action type this reducer processes.
    type Action;

    /// The environment type with injected dependencies.
    type Environment;

    /// Reduce an action into state changes and effects.
    ///
    /// Implementations update `state` in place and return the effects the
    /// `Store` should carry out. A reducer never performs I/O itself.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}
