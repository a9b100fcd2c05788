//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::SessionStore;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, store: &SessionStore) -> Result<()> {
    if store.clear()? {
        output::success("Logged out");
    } else {
        output::note("No stored session");
    }
    Ok(())
}
