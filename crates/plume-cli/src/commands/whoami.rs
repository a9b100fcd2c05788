//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::SessionStore;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Ask the PDS to confirm the access token is still accepted
    #[arg(long)]
    pub verify: bool,
}

pub async fn run(args: WhoamiArgs, store: &SessionStore) -> Result<()> {
    let stored = store.require()?;

    output::field("DID", stored.session.did.as_str());
    output::field("Handle", stored.session.handle.as_str());
    output::field("PDS", &stored.pds);

    if args.verify {
        let info = stored
            .client()?
            .get_session(&stored.session.access_token)
            .await
            .context("Failed to verify session")?;

        if info.did != stored.session.did {
            output::error(&format!("PDS reports a different account: {}", info.did));
        }
        if let Some(email) = &info.email {
            output::field("Email", email);
        }
        if let Some(active) = info.active {
            output::field("Active", if active { "yes" } else { "no" });
        }
        output::success("Access token accepted");
    }

    Ok(())
}
