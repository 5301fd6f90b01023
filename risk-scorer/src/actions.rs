//! The risk scorer's action enum: one command for `/predict`, plus the
//! terminal event its effect dispatches back once scoring has resolved.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RiskScorerError;
use crate::providers::PredictRequest;

/// Every action the risk scorer's reducer can receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RiskScorerAction {
    /// `POST /predict`.
    Predict {
        /// The login-attempt envelope to score.
        request: PredictRequest,
    },
    /// Scoring finished (successfully or not).
    PredictCompleted(Result<PredictOutcome, RiskScorerError>),
}

/// Outcome of a completed `/predict` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictOutcome {
    /// Correlation id for this login attempt.
    pub event_id: Uuid,
    /// Risk score in `[0, 100]`.
    pub risk_score: u8,
    /// Whether a new row was inserted for this call.
    pub persisted: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::providers::GeoInfo;

    #[test]
    fn action_round_trips_through_json() {
        let action = RiskScorerAction::Predict {
            request: PredictRequest {
                event_id: Uuid::new_v4(),
                user_id: None,
                email: "a@example.com".to_string(),
                ip_address: "127.0.0.1".parse().unwrap(),
                user_agent: "test-agent".to_string(),
                geo: GeoInfo { country: "Local".to_string(), region: None, city: None },
                was_successful: true,
            },
        };
        let json = serde_json::to_string(&action).unwrap();
        let _: RiskScorerAction = serde_json::from_str(&json).unwrap();
    }
}
