//! Route table (§4.1).

use std::sync::Arc;

use amfa_core::environment::Clock;
use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::{change_password, current_user, delete_user, health, login, logout, register, verify_otp};
use crate::providers::{Cache, GeoLocator, MfaArbiterClient, PasswordHasher, RiskScorerClient, TokenSigner, UserRepository};

/// Build the authenticator's Axum router over a shared [`AppState`].
pub fn build<U, H, G, Ca, R, M, T, Clk>(state: Arc<AppState<U, H, G, Ca, R, M, T, Clk>>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    G: GeoLocator + Clone + Send + Sync + 'static,
    Ca: Cache + Clone + Send + Sync + 'static,
    R: RiskScorerClient + Clone + Send + Sync + 'static,
    M: MfaArbiterClient + Clone + Send + Sync + 'static,
    T: TokenSigner + Clone + Send + Sync + 'static,
    Clk: Clock + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register::register::<U, H, G, Ca, R, M, T, Clk>))
        .route("/login", post(login::login::<U, H, G, Ca, R, M, T, Clk>))
        .route("/verify-otp", post(verify_otp::verify_otp::<U, H, G, Ca, R, M, T, Clk>))
        .route("/logout", post(logout::logout::<U, H, G, Ca, R, M, T, Clk>))
        .route("/current-user", get(current_user::current_user::<U, H, G, Ca, R, M, T, Clk>))
        .route("/change-password", post(change_password::change_password::<U, H, G, Ca, R, M, T, Clk>))
        .route("/users/:email", delete(delete_user::delete_user::<U, H, G, Ca, R, M, T, Clk>))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready::<U, H, G, Ca, R, M, T, Clk>))
        .with_state(state)
}
