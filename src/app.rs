use tracing::debug;

use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        base_url,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json, base_url)?;
    debug!(profile = %ctx.profile, base_url = %ctx.base_url, "context ready");

    match command {
        Command::Login => commands::auth::login(&ctx),
        Command::Capture(args) => commands::auth::capture(&ctx, args),
        Command::Status => commands::auth::status(&ctx).await,
        Command::Logout => commands::auth::logout(&ctx).await,
        Command::Inbox(args) => commands::inbox::run(&ctx, args).await,
        Command::Sync(args) => commands::sync::run(&ctx, args).await,
    }
}
