//! Authenticator: password login, MFA handoff, and account lifecycle (§4.1).
//!
//! Owns the `users` table and the bearer-credential lifecycle. Delegates
//! risk scoring to the risk scorer and the one-time-code handshake to the
//! MFA arbiter, both over HTTP (§5), and publishes `login.attempted` events
//! for the audit trail (§4.5).

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

pub use actions::AuthenticatorAction;
pub use app_state::AppState;
pub use environment::AuthenticatorEnvironment;
pub use error::AuthenticatorError;
pub use reducer::AuthenticatorReducer;
pub use state::AuthenticatorState;
