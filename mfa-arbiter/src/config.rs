//! Process configuration, loaded once at startup (§10.4).
//!
//! Required settings (database URL, cache URL, broker URL, SMTP
//! credentials) have no defaults and fail the process fast if missing;
//! genuinely optional settings get a sensible default.

use std::env;

/// Typed configuration for the MFA arbiter process.
#[derive(Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to, e.g. `0.0.0.0:8082`.
    pub bind_addr: String,

    /// Postgres connection string for the MFA arbiter's own database.
    pub database_url: String,

    /// Redis-compatible cache connection string.
    pub cache_url: String,

    /// Kafka-compatible broker bootstrap servers.
    pub broker_url: String,

    /// Risk score at or above which a challenge is required (§9).
    pub risk_threshold: u8,

    /// SMTP server address.
    pub smtp_server: String,

    /// SMTP server port.
    pub smtp_port: u16,

    /// SMTP authentication username.
    pub smtp_username: String,

    /// SMTP authentication password.
    pub smtp_password: String,

    /// Sender email address for one-time code messages.
    pub from_email: String,

    /// Sender display name for one-time code messages.
    pub from_name: String,
}

/// Error loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable was set but could not be parsed into the expected type.
    #[error("environment variable {0} has an invalid value")]
    InvalidValue(&'static str),
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` for the first required variable
    /// that is unset, or `ConfigError::InvalidValue` if `RISK_THRESHOLD` or
    /// `SMTP_PORT` is set but not a valid number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("MFA_ARBITER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string()),
            database_url: required("DATABASE_URL")?,
            cache_url: required("CACHE_URL")?,
            broker_url: required("BROKER_URL")?,
            risk_threshold: optional_parsed("RISK_THRESHOLD", "RISK_THRESHOLD", crate::constants::DEFAULT_RISK_THRESHOLD)?,
            smtp_server: required("SMTP_SERVER")?,
            smtp_port: optional_parsed("SMTP_PORT", "SMTP_PORT", 587)?,
            smtp_username: required("SMTP_USERNAME")?,
            smtp_password: required("SMTP_PASSWORD")?,
            from_email: required("SMTP_FROM_EMAIL")?,
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Account Security".to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional_parsed<T: std::str::FromStr>(name: &'static str, error_name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue(error_name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_fails_fast() {
        assert!(matches!(required("THIS_VAR_DOES_NOT_EXIST_42"), Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn optional_parsed_falls_back_to_default() {
        let value: u8 = optional_parsed("THIS_VAR_DOES_NOT_EXIST_43", "THIS_VAR_DOES_NOT_EXIST_43", 50).unwrap();
        assert_eq!(value, 50);
    }
}
