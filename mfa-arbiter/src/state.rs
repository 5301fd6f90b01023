//! Request-scoped state for the MFA arbiter's reducer.
//!
//! Every request this service handles is a self-contained unit of work: a
//! `/check` either issues a challenge or doesn't, a `/verify` either saves a
//! trusted device or rejects the code, and that is the end of the story for
//! that particular `Store`. A fresh `MfaArbiterState` is created per request
//! and discarded once the handler has read the final outcome.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MfaArbiterError;

/// The terminal outcome of one request, once the reducer has finished
/// reacting to every effect it dispatched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The reducer has not yet produced a terminal outcome.
    #[default]
    Pending,

    /// `POST /check` resolved without a challenge: the device is trusted or
    /// the risk score didn't clear the threshold.
    CheckResolved {
        /// Correlation id echoed from the request.
        event_id: Uuid,
        /// Whether a challenge was issued.
        mfa_required: bool,
    },

    /// `POST /verify` accepted the one-time code.
    Verified {
        /// Whether the device was persisted as trusted for 30 days.
        device_saved: bool,
    },

    /// `GET /otp-logs/{event_id}` found no logs for this event.
    NoOtpLogs,

    /// `GET /otp-logs/{event_id}` found logs for this event.
    OtpLogs {
        /// Number of `sent` log rows.
        sent_logs_count: u32,
        /// Number of `verified` log rows.
        verified_logs_count: u32,
        /// The full log history, newest first.
        logs: Vec<crate::providers::OtpLogEntry>,
    },

    /// `DELETE /trusted/{user_id}` or `DELETE /otp-logs/{email}` removed
    /// some number of rows.
    RowsRemoved {
        /// Number of rows removed.
        rows_removed: u64,
    },

    /// The request failed; see the embedded error for why.
    Failed(MfaArbiterError),
}

/// The MFA arbiter reducer's entire state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MfaArbiterState {
    /// The request's terminal outcome, or `Outcome::Pending` while effects
    /// are still in flight.
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_pending() {
        assert_eq!(MfaArbiterState::default().outcome, Outcome::Pending);
    }
}
