//! Subcommand implementations.

mod check;
mod decode;
mod get_record;
mod login;
mod logout;
mod refresh;
mod token;
mod types;
mod watch;
mod whoami;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::session::SessionStore;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new session (login)
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Renew the stored session now
    Refresh(refresh::RefreshArgs),

    /// Show token expiry and when renewal would run
    Token(token::TokenArgs),

    /// Keep the stored session renewed until interrupted
    Watch(watch::WatchArgs),

    /// Fetch a single record and decode its value
    GetRecord(get_record::GetRecordArgs),

    /// Decode a `$type`-tagged payload from a file or stdin
    Decode(decode::DecodeArgs),

    /// Validate DIDs, handles, AT URIs, NSIDs and CIDs
    Check(check::CheckArgs),

    /// List the `$type` tags the decoder knows
    Types(types::TypesArgs),
}

pub async fn handle(command: Command, session_file: Option<PathBuf>) -> Result<()> {
    // Offline commands never touch the session file.
    let store = || SessionStore::locate(session_file.clone());

    match command {
        Command::Login(args) => login::run(args, &store()?).await,
        Command::Logout(args) => logout::run(args, &store()?),
        Command::Whoami(args) => whoami::run(args, &store()?).await,
        Command::Refresh(args) => refresh::run(args, &store()?).await,
        Command::Token(args) => token::run(args, &store()?),
        Command::Watch(args) => watch::run(args, &store()?).await,
        Command::GetRecord(args) => get_record::run(args, &store()?).await,
        Command::Decode(args) => decode::run(args),
        Command::Check(args) => check::run(args),
        Command::Types(args) => types::run(args),
    }
}
