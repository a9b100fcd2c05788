//! Watch command implementation.
//!
//! Runs a session manager with auto-renewal and writes every renewed
//! session back to the session file.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;
use tracing::info;

use plume_session::{RefreshOutcome, SessionConfig, SessionManager, renewal_delay};

use crate::output;
use crate::session::{SessionStore, StoredSession};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Renew on a fixed interval (seconds) instead of at token expiry
    #[arg(long)]
    pub interval: Option<u64>,
}

pub async fn run(args: WatchArgs, store: &SessionStore) -> Result<()> {
    let mut stored = store.require()?;
    let pds = stored.pds_url()?;

    let mut config = SessionConfig::new().with_auto_renew(true);
    if let Some(secs) = args.interval {
        config = config.with_renewal_interval(Duration::from_secs(secs));
    }

    match renewal_delay(&config, &stored.session.refresh_token, Utc::now()) {
        None => bail!("Refresh token expiry is unreadable; pass --interval to renew on a schedule"),
        Some(Duration::ZERO) => {
            output::note("Refresh token expired, renewing...");
            let session = match stored
                .manager(SessionConfig::default())?
                .refresh_now()
                .await
                .context("Expired session could not be renewed; run 'plume login' again")?
            {
                RefreshOutcome::Renewed(session) => session,
                outcome => bail!("Refresh did not complete: {:?}", outcome),
            };
            stored = StoredSession::new(&pds, session);
            store
                .save(&stored)
                .context("Failed to save renewed session")?;
        }
        Some(_) => {}
    }

    let manager = stored.manager(config)?;
    let mut updates = manager.subscribe();
    // A token expiring right now may have renewed before we subscribed.
    if manager.session().as_ref() != Some(&stored.session) {
        updates.mark_changed();
    }

    output::field("DID", stored.session.did.as_str());
    print_next_renewal(&manager);
    output::note("Watching session, press Ctrl-C to stop");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                let Some(session) = current else {
                    output::error("Session cleared");
                    break;
                };

                store
                    .save(&StoredSession::new(&pds, session))
                    .context("Failed to save renewed session")?;
                info!("Renewed session saved");
                output::success("Session renewed");
                print_next_renewal(&manager);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                output::note("Stopping...");
                break;
            }
        }
    }

    manager.dispose();
    Ok(())
}

fn print_next_renewal(manager: &SessionManager) {
    match manager.next_renewal_delay() {
        Some(delay) => output::field("Next renewal", &format!("in {}", output::duration(delay))),
        None => output::field("Next renewal", "not scheduled"),
    }
}
