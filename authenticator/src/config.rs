//! Process configuration, loaded once at startup (§10.4).
//!
//! Required settings (database URL, cache URL, broker URL, JWT secret) have
//! no defaults and fail the process fast if missing; genuinely optional
//! settings get a sensible default.

use std::env;

/// Typed configuration for the authenticator process.
#[derive(Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to, e.g. `0.0.0.0:8080`.
    pub bind_addr: String,

    /// Postgres connection string for the authenticator's own database.
    pub database_url: String,

    /// Redis-compatible cache connection string.
    pub cache_url: String,

    /// Kafka-compatible broker bootstrap servers.
    pub broker_url: String,

    /// Shared secret for signing and verifying bearer credentials.
    pub jwt_secret: String,

    /// Base URL of the risk scorer service, e.g. `http://risk-scorer:8081`.
    pub risk_scorer_url: String,

    /// Base URL of the MFA arbiter service, e.g. `http://mfa-arbiter:8082`.
    pub mfa_arbiter_url: String,

    /// Base URL of the IP geolocation service, e.g. `http://geolocation:8090`.
    pub geolocation_url: String,
}

/// Error loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` for the first required variable
    /// that is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("AUTHENTICATOR_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: required("DATABASE_URL")?,
            cache_url: required("CACHE_URL")?,
            broker_url: required("BROKER_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            risk_scorer_url: env::var("RISK_SCORER_URL")
                .unwrap_or_else(|_| "http://risk-scorer:8081".to_string()),
            mfa_arbiter_url: env::var("MFA_ARBITER_URL")
                .unwrap_or_else(|_| "http://mfa-arbiter:8082".to_string()),
            geolocation_url: env::var("GEOLOCATION_URL")
                .unwrap_or_else(|_| "http://geolocation:8090".to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_fails_fast() {
        assert!(matches!(required("THIS_VAR_DOES_NOT_EXIST_42"), Err(ConfigError::MissingVar(_))));
    }
}
