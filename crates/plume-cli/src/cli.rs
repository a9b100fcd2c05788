//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Command;

/// AT Protocol session and record tool.
#[derive(Parser, Debug)]
#[command(name = "plume")]
#[command(author, version = env!("PLUME_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Session file to use instead of the per-user data directory
    #[arg(long, env = "PLUME_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}
