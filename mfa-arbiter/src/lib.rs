//! MFA arbiter: decides whether a login needs a one-time code, dispatches
//! and verifies it, and remembers trusted devices (§4.3).
//!
//! Owns the `trusted_devices` and `otp_logs` tables, plus the cache-only
//! pending challenge and trust-hint entries. Every mismatch on `/verify`
//! burns the pending challenge outright (fail-closed): a wrong code, the
//! wrong device, or a stale event id all cost the caller their one shot at
//! this challenge, same as a wrong code would.

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
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use actions::MfaArbiterAction;
pub use app_state::AppState;
pub use environment::MfaArbiterEnvironment;
pub use error::MfaArbiterError;
pub use reducer::MfaArbiterReducer;
pub use state::MfaArbiterState;
