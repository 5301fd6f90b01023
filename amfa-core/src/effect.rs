//! Side effect descriptions.
//!
//! Effects describe side effects to be performed by the runtime. They are
//! values, not execution — a reducer returns effects and the `Store` carries
//! them out.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Describes a side effect to be executed by the `Store` runtime.
///
/// Reducers return these instead of performing I/O directly, which keeps
/// reducers pure and lets tests run at memory speed against mock providers.
#[allow(missing_docs)]
pub enum Effect<Action> {
    /// No-op effect.
    None,

    /// Run effects concurrently; none depends on another's result.
    Parallel(Vec<Effect<Action>>),

    /// Run effects in order; later effects may depend on earlier ones having completed.
    Sequential(Vec<Effect<Action>>),

    /// Dispatch an action after a delay (timeouts, scheduled retries).
    Delay {
        /// How long to wait.
        duration: Duration,
        /// Action to dispatch after the delay.
        action: Box<Action>,
    },

    /// Arbitrary async computation, optionally feeding a follow-up action back
    /// into the reducer.
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Effect::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Effect::Delay { duration, action } => f
                .debug_struct("Effect::Delay")
                .field("duration", duration)
                .field("action", action)
                .finish(),
            Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

impl<Action> Effect<Action> {
    /// Combine effects to run in parallel.
    #[must_use]
    pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Parallel(effects)
    }

    /// Chain effects to run sequentially.
    #[must_use]
    pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Sequential(effects)
    }

    /// Transform the action type this effect produces.
    ///
    /// Used to lift a sub-reducer's effects into a parent action type.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        F: Fn(Action) -> B + Send + Sync + 'static + Clone,
        Action: 'static,
        B: Send + 'static,
    {
        map_effect(self, f)
    }
}

fn map_effect<A, B, F>(effect: Effect<A>, f: F) -> Effect<B>
where
    F: Fn(A) -> B + Send + Sync + 'static + Clone,
    A: 'static,
    B: Send + 'static,
{
    match effect {
        Effect::None => Effect::None,
        Effect::Parallel(effects) => Effect::Parallel(
            effects
                .into_iter()
                .map(|e| map_effect(e, f.clone()))
                .collect(),
        ),
        Effect::Sequential(effects) => Effect::Sequential(
            effects
                .into_iter()
                .map(|e| map_effect(e, f.clone()))
                .collect(),
        ),
        Effect::Delay { duration, action } => Effect::Delay {
            duration,
            action: Box::new(f(*action)),
        },
        Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
    }
}
