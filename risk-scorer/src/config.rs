//! Process configuration, loaded once at startup (§10.4).

use std::env;

/// Typed configuration for the risk scorer process.
#[derive(Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to, e.g. `0.0.0.0:8081`.
    pub bind_addr: String,

    /// Postgres connection string for the risk scorer's own database.
    pub database_url: String,

    /// Kafka-compatible broker bootstrap servers.
    pub broker_url: String,

    /// Base URL of the MFA arbiter service, for OTP log verification.
    pub mfa_arbiter_url: String,
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
            bind_addr: env::var("RISK_SCORER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string()),
            database_url: required("DATABASE_URL")?,
            broker_url: required("BROKER_URL")?,
            mfa_arbiter_url: env::var("MFA_ARBITER_URL").unwrap_or_else(|_| "http://mfa-arbiter:8082".to_string()),
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
