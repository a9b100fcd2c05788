//! Renewal deadline computation.

use chrono::{DateTime, Utc};
use plume_core::RefreshToken;
use std::time::Duration;
use tracing::warn;

use crate::config::SessionConfig;

/// Longest delay a renewal timer is armed for (`i32::MAX` milliseconds,
/// about 24.8 days).
pub const MAX_RENEWAL_DELAY: Duration = Duration::from_millis(i32::MAX as u64);

const MAX_RENEWAL_MILLIS: i64 = i32::MAX as i64;

/// How long to wait before renewing a session with this refresh token.
///
/// A configured interval always wins. Otherwise the delay runs until the
/// token's `exp` claim; an expiry already in the past renews immediately.
/// Either way the result is capped at [`MAX_RENEWAL_DELAY`].
///
/// Returns `None` when no interval is configured and the token's expiry
/// cannot be read. The claims are not verified.
pub fn renewal_delay(
    config: &SessionConfig,
    refresh_token: &RefreshToken,
    now: DateTime<Utc>,
) -> Option<Duration> {
    if let Some(interval) = config.renewal_interval {
        return Some(interval.min(MAX_RENEWAL_DELAY));
    }

    let claims = match refresh_token.claims() {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Refresh token claims unreadable, renewal not scheduled");
            return None;
        }
    };

    let Some(exp) = claims.exp else {
        warn!("Refresh token has no exp claim, renewal not scheduled");
        return None;
    };

    let remaining = exp
        .saturating_mul(1000)
        .saturating_sub(now.timestamp_millis())
        .clamp(0, MAX_RENEWAL_MILLIS);
    Some(Duration::from_millis(remaining as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    fn token_expiring_at(exp: i64) -> RefreshToken {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256K"}"#);
        let body = URL_SAFE_NO_PAD.encode(json!({"scope": "com.atproto.refresh", "exp": exp}).to_string());
        RefreshToken::new(format!("{}.{}.sig", header, body))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn follows_exp_claim() {
        let token = token_expiring_at(now().timestamp() + 3600);
        let delay = renewal_delay(&SessionConfig::default(), &token, now());
        assert_eq!(delay, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn fractional_exp_claim() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256K"}"#);
        let body = URL_SAFE_NO_PAD.encode(br#"{"exp":1700003600.5}"#);
        let token = RefreshToken::new(format!("{}.{}.sig", header, body));
        let delay = renewal_delay(&SessionConfig::default(), &token, now());
        assert_eq!(delay, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn interval_wins() {
        let token = token_expiring_at(now().timestamp() + 3600);
        let config = SessionConfig::new().with_renewal_interval(Duration::from_secs(60));
        assert_eq!(renewal_delay(&config, &token, now()), Some(Duration::from_secs(60)));
    }

    #[test]
    fn interval_wins_over_unreadable_token() {
        let config = SessionConfig::new().with_renewal_interval(Duration::from_secs(5));
        let token = RefreshToken::new("opaque");
        assert_eq!(renewal_delay(&config, &token, now()), Some(Duration::from_secs(5)));
    }

    #[test]
    fn past_expiry_is_immediate() {
        let token = token_expiring_at(now().timestamp() - 10);
        assert_eq!(
            renewal_delay(&SessionConfig::default(), &token, now()),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn far_expiry_is_capped() {
        let token = token_expiring_at(now().timestamp() + 365 * 24 * 3600);
        assert_eq!(
            renewal_delay(&SessionConfig::default(), &token, now()),
            Some(MAX_RENEWAL_DELAY)
        );

        let config = SessionConfig::new().with_renewal_interval(Duration::from_secs(u64::MAX));
        assert_eq!(renewal_delay(&config, &token, now()), Some(MAX_RENEWAL_DELAY));
    }

    #[test]
    fn unreadable_token_skips() {
        let token = RefreshToken::new("not.a-jwt");
        assert_eq!(renewal_delay(&SessionConfig::default(), &token, now()), None);
    }

    #[test]
    fn missing_exp_skips() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let body = URL_SAFE_NO_PAD.encode(br#"{"sub":"did:plc:abc"}"#);
        let token = RefreshToken::new(format!("{}.{}.sig", header, body));
        assert_eq!(renewal_delay(&SessionConfig::default(), &token, now()), None);
    }
}
