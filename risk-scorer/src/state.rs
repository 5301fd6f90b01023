//! Request-scoped state for the risk scorer's reducer.
//!
//! As with the authenticator, one `Store` is built per request: a `/predict`
//! call either produces a score or fails, and that is the entire lifetime of
//! the `RiskScorerState` that carries the answer back to the handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RiskScorerError;

/// The terminal outcome of one `/predict` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The reducer has not yet produced a terminal outcome.
    #[default]
    Pending,

    /// Scoring finished; `persisted` is `false` when `event_id` was already
    /// on file and the stored score was returned instead of recomputing.
    Scored {
        /// Correlation id for this login attempt.
        event_id: Uuid,
        /// Risk score in `[0, 100]`.
        risk_score: u8,
        /// Whether a new row was inserted for this call.
        persisted: bool,
    },

    /// The request failed; see the embedded error for why.
    Failed(RiskScorerError),
}

/// The risk scorer reducer's entire state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskScorerState {
    /// The request's terminal outcome, or `Outcome::Pending` while effects
    /// are still in flight.
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_pending() {
        assert_eq!(RiskScorerState::default().outcome, Outcome::Pending);
    }
}
