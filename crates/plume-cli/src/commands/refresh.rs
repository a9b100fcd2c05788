//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;

use plume_session::{RefreshOutcome, SessionConfig};

use crate::output;
use crate::session::{SessionStore, StoredSession};

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, store: &SessionStore) -> Result<()> {
    let stored = store.require()?;
    let manager = stored.manager(SessionConfig::default())?;

    output::note("Refreshing session...");

    let session = match manager
        .refresh_now()
        .await
        .context("Failed to refresh session")?
    {
        RefreshOutcome::Renewed(session) => session,
        outcome => anyhow::bail!("Refresh did not complete: {:?}", outcome),
    };

    store
        .save(&StoredSession::new(&stored.pds_url()?, session.clone()))
        .context("Failed to save refreshed session")?;

    output::success("Session refreshed successfully");
    output::field("DID", session.did.as_str());

    Ok(())
}
