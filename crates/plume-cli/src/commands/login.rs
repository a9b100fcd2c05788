//! Login command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use plume_core::{Credentials, PdsUrl};
use plume_session::{SessionConfig, SessionManager};
use plume_xrpc::XrpcClient;

use crate::output;
use crate::session::{SessionStore, StoredSession};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Handle or DID to authenticate with
    #[arg(long)]
    pub identifier: String,

    /// Account password or app password
    #[arg(long, env = "PLUME_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// PDS base URL
    #[arg(long, env = "PLUME_PDS", default_value = "https://bsky.social")]
    pub pds: String,
}

pub async fn run(args: LoginArgs, store: &SessionStore) -> Result<()> {
    let pds = PdsUrl::new(&args.pds).context("Invalid PDS URL")?;
    let client = XrpcClient::new(pds.clone()).context("Failed to create XRPC client")?;
    let manager = SessionManager::new(Arc::new(client), SessionConfig::default());

    output::note("Logging in...");

    let session = manager
        .login(&Credentials::new(&args.identifier, &args.password))
        .await
        .context("Failed to login")?;

    store
        .save(&StoredSession::new(&pds, session.clone()))
        .context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("DID", session.did.as_str());
    output::field("Handle", session.handle.as_str());
    output::field("PDS", pds.as_str());

    Ok(())
}
