//! Small grouped constants used across the authenticator.

/// Cache key prefixes and shapes (§3).
pub mod cache_keys {
    /// `mfa:{email}` → pending challenge's event id, TTL 300s.
    pub fn pending_mfa(email: &str) -> String {
        format!("mfa:{email}")
    }

    /// `bl:{token}` → blacklisted marker, TTL = token's remaining lifetime.
    pub fn blacklist(token: &str) -> String {
        format!("bl:{token}")
    }

    /// `geoloc:{ip}` → cached geolocation lookup, TTL 30 days.
    pub fn geolocation(ip: &str) -> String {
        format!("geoloc:{ip}")
    }
}

/// Token-related durations (§6).
pub mod durations {
    use std::time::Duration;

    /// Default bearer credential lifetime: 60 minutes.
    pub const CREDENTIAL_TTL: Duration = Duration::from_secs(60 * 60);

    /// Pending-MFA cache entry lifetime: matches the MFA arbiter's OTP TTL.
    pub const PENDING_MFA_TTL: Duration = Duration::from_secs(300);

    /// Cached geolocation lookup lifetime: 30 days.
    pub const GEOLOCATION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    /// Inter-service HTTP call timeout (§5).
    pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_shapes_match_the_contract() {
        assert_eq!(cache_keys::pending_mfa("a@example.com"), "mfa:a@example.com");
        assert_eq!(cache_keys::blacklist("tok"), "bl:tok");
        assert_eq!(cache_keys::geolocation("1.2.3.4"), "geoloc:1.2.3.4");
    }
}
