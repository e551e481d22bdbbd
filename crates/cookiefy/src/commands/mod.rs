//! Command dispatch: bridges CLI args -> console workflows -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod resources;
pub mod search;
pub mod sites;
pub mod stats;
pub mod util;

use cookiefy_core::{Console, Resource};

use crate::cli::{Command, GlobalOpts};
use crate::config::ResolvedProfile;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    profile: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(console, args, profile, global).await,
        Command::Logout => auth::logout(console, global).await,
        Command::Whoami => auth::whoami(console, profile, global),
        Command::Search(args) => search::handle(console, args, global).await,
        Command::Sites(args) => sites::handle(console, args, global).await,
        Command::Users(args) => resources::handle(console, Resource::Users, args, global).await,
        Command::Lists(args) => resources::handle(console, Resource::Lists, args, global).await,
        Command::Hashtags(args) => {
            resources::handle(console, Resource::Hashtags, args, global).await
        }
        Command::Restaurants(args) => {
            resources::handle(console, Resource::Restaurants, args, global).await
        }
        Command::Stats(args) => stats::handle(console, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
