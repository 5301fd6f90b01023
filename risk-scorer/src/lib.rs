//! Risk scorer: bounded risk scoring over login history (§4.2).
//!
//! Owns the `login_attempts` table. Joins the current attempt against the
//! email's history, cross-checking each verified-successful prior attempt
//! against the MFA arbiter's OTP log so a successful password check that
//! was never actually backed by MFA doesn't count as trust. Publishes
//! `risk.scored` events for the audit trail (§4.5).

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod app_state;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod reducer;
pub mod router;
pub mod scoring;
pub mod state;
pub mod verification_cache;

pub use actions::RiskScorerAction;
pub use app_state::AppState;
pub use environment::RiskScorerEnvironment;
pub use error::RiskScorerError;
pub use reducer::RiskScorerReducer;
pub use state::RiskScorerState;
