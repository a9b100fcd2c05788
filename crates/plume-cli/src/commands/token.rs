//! Token command implementation.
//!
//! Reads the stored tokens' claims without verifying them and reports when
//! a session manager would renew.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use plume_core::TokenClaims;
use plume_session::{SessionConfig, renewal_delay};

use crate::output;
use crate::session::SessionStore;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Renew on a fixed interval (seconds) instead of at token expiry
    #[arg(long)]
    pub interval: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenReport {
    did: String,
    access_expires_at: Option<DateTime<Utc>>,
    refresh_expires_at: Option<DateTime<Utc>>,
    renewal_delay_secs: Option<u64>,
    renews_at: Option<DateTime<Utc>>,
}

pub fn run(args: TokenArgs, store: &SessionStore) -> Result<()> {
    let stored = store.require()?;
    let session = &stored.session;
    let now = Utc::now();

    let mut config = SessionConfig::new().with_auto_renew(true);
    if let Some(secs) = args.interval {
        config = config.with_renewal_interval(Duration::from_secs(secs));
    }

    let access = TokenClaims::read(session.access_token.as_str());
    let refresh = session.refresh_token.claims();
    let delay = renewal_delay(&config, &session.refresh_token, now);

    let report = TokenReport {
        did: session.did.to_string(),
        access_expires_at: access.as_ref().ok().and_then(TokenClaims::expires_at),
        refresh_expires_at: refresh.as_ref().ok().and_then(TokenClaims::expires_at),
        renewal_delay_secs: delay.map(|d| d.as_secs()),
        renews_at: delay
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| now + d),
    };

    if args.json {
        return output::json_pretty(&report);
    }

    output::field("DID", &report.did);
    output::field("Access token", &describe(&access, now));
    output::field("Refresh token", &describe(&refresh, now));
    match (delay, report.renews_at) {
        (Some(delay), Some(at)) => output::field(
            "Renewal",
            &format!("in {} ({})", output::duration(delay), at.to_rfc3339()),
        ),
        _ => output::field("Renewal", "not scheduled (refresh token expiry unreadable)"),
    }

    Ok(())
}

fn describe(claims: &plume_core::Result<TokenClaims>, now: DateTime<Utc>) -> String {
    let claims = match claims {
        Ok(claims) => claims,
        Err(e) => return format!("unreadable ({})", e),
    };
    let Some(expires_at) = claims.expires_at() else {
        return "no expiry".to_string();
    };
    match (expires_at - now).to_std() {
        Ok(remaining) => format!(
            "expires {} (in {})",
            expires_at.to_rfc3339(),
            output::duration(remaining)
        ),
        Err(_) => format!("expired {}", expires_at.to_rfc3339()),
    }
}
