//! The rule-based scoring algorithm (§4.2): start at 0, apply each rule in
//! order, cap at 100. Pluggable with a learned scorer by swapping out this
//! module's call site in the reducer; the wire contract does not change.

use chrono::{DateTime, Timelike, Utc};

use crate::constants::{
    CARRY_FORWARD_SCORE, FAILURE_PENALTY_POINTS, FIRST_LOGIN_SCORE, MAX_SCORE, NEW_COUNTRY_POINTS,
    NEW_DEVICE_POINTS, NEW_IP_POINTS, NEW_REGION_POINTS, ODD_HOUR_END, ODD_HOUR_POINTS, ODD_HOUR_START,
    THREE_IN_A_ROW_POINTS,
};
use crate::providers::{LoginAttempt, MfaLogClient, PredictRequest};
use crate::verification_cache::VerificationCache;

/// A past attempt with `was_successful = true` is *verified* only if the
/// MFA arbiter confirms a challenge was issued and completed for it, or
/// confirms none was issued at all (trusted device / low score path).
async fn is_verified<M: MfaLogClient>(
    event_id: uuid::Uuid,
    mfa_log_client: &M,
    cache: &VerificationCache,
) -> bool {
    if let Some(verified) = cache.get(event_id) {
        return verified;
    }
    match mfa_log_client.otp_logs(event_id).await {
        Ok(None) => {
            cache.set(event_id, true);
            true
        }
        Ok(Some(summary)) => {
            let verified = summary.sent_logs_count == 1 && summary.verified_logs_count == 1;
            cache.set(event_id, verified);
            verified
        }
        // A transient upstream failure is scored conservatively as
        // unverified but deliberately not memoized, so a later call for
        // the same event can still resolve it once the arbiter recovers.
        Err(_) => false,
    }
}

async fn any_verified_success<M, P>(
    history: &[LoginAttempt],
    mfa_log_client: &M,
    cache: &VerificationCache,
    matches: P,
) -> bool
where
    M: MfaLogClient,
    P: Fn(&LoginAttempt) -> bool,
{
    for row in history {
        if row.was_successful && matches(row) && is_verified(row.event_id, mfa_log_client, cache).await {
            return true;
        }
    }
    false
}

/// Score a login attempt against its email's history.
///
/// `history` must be every prior attempt for the same email, newest first,
/// and must not include the attempt being scored.
pub async fn score<M: MfaLogClient>(
    request: &PredictRequest,
    history: &[LoginAttempt],
    now: DateTime<Utc>,
    mfa_log_client: &M,
    cache: &VerificationCache,
) -> u8 {
    if let Some(most_recent) = history.first() {
        if most_recent.risk_score == CARRY_FORWARD_SCORE
            && !is_verified(most_recent.event_id, mfa_log_client, cache).await
        {
            return CARRY_FORWARD_SCORE;
        }
    }

    if request.user_id.is_some() && history.is_empty() {
        return FIRST_LOGIN_SCORE;
    }

    let mut total: u32 = 0;

    if !any_verified_success(history, mfa_log_client, cache, |r| r.ip_address == request.ip_address).await {
        total += u32::from(NEW_IP_POINTS);
    }

    let hour = now.hour();
    if hour < ODD_HOUR_START || hour > ODD_HOUR_END {
        total += u32::from(ODD_HOUR_POINTS);
    }

    if !any_verified_success(history, mfa_log_client, cache, |r| r.user_agent == request.user_agent).await {
        total += u32::from(NEW_DEVICE_POINTS);
    }

    if request.geo.country == "Unknown" {
        total += u32::from(NEW_COUNTRY_POINTS);
    } else if request.geo.country != "Local" {
        let country = request.geo.country.clone();
        if !any_verified_success(history, mfa_log_client, cache, |r| r.country == country).await {
            total += u32::from(NEW_COUNTRY_POINTS);
        }
    }

    if let Some(region) = &request.geo.region {
        if !any_verified_success(history, mfa_log_client, cache, |r| r.region.as_deref() == Some(region.as_str()))
            .await
        {
            total += u32::from(NEW_REGION_POINTS);
        }
    }

    if !request.was_successful {
        total += u32::from(FAILURE_PENALTY_POINTS);
    }

    if history.len() >= 3 {
        let mut all_bad = true;
        for row in &history[..3] {
            let bad = if row.was_successful { !is_verified(row.event_id, mfa_log_client, cache).await } else { true };
            if !bad {
                all_bad = false;
                break;
            }
        }
        if all_bad {
            total += u32::from(THREE_IN_A_ROW_POINTS);
        }
    }

    u8::try_from(total.min(u32::from(MAX_SCORE))).unwrap_or(MAX_SCORE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use uuid::Uuid;

    use super::*;
    use crate::providers::{GeoInfo, OtpLogSummary};

    struct AlwaysVerified;

    impl MfaLogClient for AlwaysVerified {
        async fn otp_logs(&self, _event_id: Uuid) -> crate::error::Result<Option<OtpLogSummary>> {
            Ok(None)
        }
    }

    fn request(user_id: Option<Uuid>, ip: &str, country: &str, was_successful: bool) -> PredictRequest {
        PredictRequest {
            event_id: Uuid::new_v4(),
            user_id,
            email: "a@example.com".to_string(),
            ip_address: ip.parse().unwrap(),
            user_agent: "agent-1".to_string(),
            geo: GeoInfo { country: country.to_string(), region: None, city: None },
            was_successful,
        }
    }

    fn noon() -> DateTime<Utc> {
        "2026-01-01T12:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn first_login_for_known_user_scores_fifty() {
        let req = request(Some(Uuid::new_v4()), "1.2.3.4", "Local", true);
        let cache = VerificationCache::new();
        let s = score(&req, &[], noon(), &AlwaysVerified, &cache).await;
        assert_eq!(s, 50);
    }

    #[tokio::test]
    async fn unknown_login_with_no_history_scores_via_rules() {
        let req = request(None, "1.2.3.4", "Unknown", true);
        let cache = VerificationCache::new();
        let s = score(&req, &[], noon(), &AlwaysVerified, &cache).await;
        // new IP (30) + new device (20) + unknown country (15) = 65
        assert_eq!(s, 65);
    }

    #[tokio::test]
    async fn odd_hour_adds_points() {
        let req = request(None, "1.2.3.4", "Unknown", true);
        let cache = VerificationCache::new();
        let early: DateTime<Utc> = "2026-01-01T03:00:00Z".parse().unwrap();
        let s = score(&req, &[], early, &AlwaysVerified, &cache).await;
        assert_eq!(s, 85);
    }

    #[tokio::test]
    async fn score_never_exceeds_one_hundred() {
        let req = request(None, "1.2.3.4", "Unknown", false);
        let cache = VerificationCache::new();
        let early: DateTime<Utc> = "2026-01-01T03:00:00Z".parse().unwrap();
        let history = vec![
            failed_row("1.2.3.4", "agent-1"),
            failed_row("1.2.3.4", "agent-1"),
            failed_row("1.2.3.4", "agent-1"),
        ];
        let s = score(&req, &history, early, &AlwaysVerified, &cache).await;
        assert_eq!(s, 100);
    }

    fn failed_row(ip: &str, agent: &str) -> LoginAttempt {
        LoginAttempt {
            event_id: Uuid::new_v4(),
            user_id: None,
            email: "a@example.com".to_string(),
            ip_address: IpAddr::V4(ip.parse::<Ipv4Addr>().unwrap()),
            user_agent: agent.to_string(),
            country: "Local".to_string(),
            region: None,
            city: None,
            timestamp: noon(),
            was_successful: false,
            risk_score: 15,
        }
    }
}
