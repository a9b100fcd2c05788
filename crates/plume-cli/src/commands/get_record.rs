//! Get record command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use plume_core::{AtUri, Did, Nsid, PdsUrl, Rkey};
use plume_session::SessionConfig;
use plume_xrpc::{RecordOutput, XrpcClient};

use crate::output;
use crate::session::{SessionStore, StoredSession};

#[derive(Args, Debug)]
pub struct GetRecordArgs {
    /// AT URI of the record (e.g., at://did:plc:.../app.bsky.feed.post/...)
    pub uri: Option<String>,

    /// Repository DID (defaults to session DID)
    #[arg(long)]
    pub repo: Option<String>,

    /// Collection NSID (alternative to URI)
    #[arg(long)]
    pub collection: Option<String>,

    /// Record key (alternative to URI)
    #[arg(long)]
    pub rkey: Option<String>,

    /// Read anonymously from this PDS instead of using the stored session
    #[arg(long)]
    pub pds: Option<String>,
}

pub async fn run(args: GetRecordArgs, store: &SessionStore) -> Result<()> {
    let record = match &args.pds {
        Some(pds) => {
            let uri = resolve_uri(&args, None)?;
            let pds = PdsUrl::new(pds).context("Invalid PDS URL")?;
            let client = XrpcClient::new(pds).context("Failed to create XRPC client")?;
            client
                .get_record(&uri, None)
                .await
                .context("Failed to get record")?
        }
        None => {
            let stored = store.require()?;
            let uri = resolve_uri(&args, Some(&stored))?;
            fetch_authenticated(&uri, stored, store).await?
        }
    };

    if let Some(unrecognized) = record.value.as_unrecognized() {
        output::note(&format!(
            "Unrecognized value ({}): {}",
            unrecognized.tag().unwrap_or("no $type"),
            unrecognized.reason()
        ));
    }
    output::json_pretty(&record.value)?;

    Ok(())
}

/// Fetch with the session's current authorization. A rejected token goes
/// through the manager's unauthorized hook, and the read is retried once.
async fn fetch_authenticated(
    uri: &AtUri,
    stored: StoredSession,
    store: &SessionStore,
) -> Result<RecordOutput> {
    let client = stored.client()?;
    let manager = stored.manager(SessionConfig::default())?;

    let authorization = manager.current_auth_header();
    let err = match client.get_record(uri, authorization.as_deref()).await {
        Ok(record) => return Ok(record),
        Err(e) if e.is_auth_error() => e,
        Err(e) => return Err(e).context("Failed to get record"),
    };

    output::note(&format!("Access token rejected ({}), refreshing...", err));
    manager
        .on_unauthorized()
        .context("No async runtime for session renewal")?
        .await
        .context("Session renewal task failed")?;

    let renewed = manager.current_auth_header();
    if renewed == authorization {
        bail!("Session could not be renewed; run 'plume login' again");
    }
    if let Some(session) = manager.session() {
        store
            .save(&StoredSession::new(&stored.pds_url()?, session))
            .context("Failed to save refreshed session")?;
    }

    client
        .get_record(uri, renewed.as_deref())
        .await
        .context("Failed to get record")
}

fn resolve_uri(args: &GetRecordArgs, stored: Option<&StoredSession>) -> Result<AtUri> {
    if let Some(uri) = &args.uri {
        return AtUri::new(uri).context("Invalid AT URI");
    }

    // Build from components
    let collection = args
        .collection
        .as_ref()
        .context("Either a URI or --collection is required")?;
    let rkey = args
        .rkey
        .as_ref()
        .context("Either a URI or --rkey is required")?;

    let repo = match (&args.repo, stored) {
        (Some(repo), _) => Did::new(repo).context("Invalid repo DID")?,
        (None, Some(stored)) => stored.session.did.clone(),
        (None, None) => bail!("--repo is required without a stored session"),
    };
    let collection = Nsid::new(collection).context("Invalid collection NSID")?;
    let rkey = Rkey::new(rkey).context("Invalid rkey")?;

    Ok(AtUri::from_parts(repo, collection, rkey))
}
