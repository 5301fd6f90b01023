//! Small grouped constants used across the MFA arbiter.

/// Cache key prefixes and shapes (§3).
pub mod cache_keys {
    /// `otp:{email}` → pending challenge, TTL 300s.
    pub fn otp_challenge(email: &str) -> String {
        format!("otp:{email}")
    }

    /// `trusted:{user_id}:{device_id}` → trust hint, TTL = remaining device
    /// lifetime.
    pub fn trusted_hint(user_id: uuid::Uuid, device_id: &str) -> String {
        format!("trusted:{user_id}:{device_id}")
    }

    /// Prefix shared by every trust hint belonging to one user, for
    /// cache-coherent invalidation on `DELETE /trusted/{user_id}`.
    pub fn trusted_hint_prefix(user_id: uuid::Uuid) -> String {
        format!("trusted:{user_id}:")
    }
}

/// Durations and other tunables (§4.3).
pub mod durations {
    use std::time::Duration;

    /// How long an issued one-time code remains valid.
    pub const OTP_TTL: Duration = Duration::from_secs(300);

    /// How long a trusted device is remembered before it must re-verify.
    pub const TRUSTED_DEVICE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
}

/// Default risk score at or above which a challenge is required, unless a
/// deployment overrides it via configuration.
pub const DEFAULT_RISK_THRESHOLD: u8 = 50;

/// Number of digits in a generated one-time code.
pub const OTP_DIGITS: u32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_shapes_match_the_contract() {
        let user_id = uuid::Uuid::nil();
        assert_eq!(cache_keys::otp_challenge("a@example.com"), "otp:a@example.com");
        assert_eq!(cache_keys::trusted_hint(user_id, "device-1"), format!("trusted:{user_id}:device-1"));
        assert_eq!(cache_keys::trusted_hint_prefix(user_id), format!("trusted:{user_id}:"));
    }
}
