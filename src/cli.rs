use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "emailing", version, about = "AI-triaged inbox client")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[arg(long, global = true, help = "Backend base url (overrides profile and env)")]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the backend's OAuth login page
    Login,
    /// Store the token carried by an OAuth redirect url
    Capture(CaptureArgs),
    /// Ask the backend whether the session is valid
    Status,
    /// Show the categorized inbox
    Inbox(InboxArgs),
    /// Ask the backend to refresh, then re-fetch the inbox
    Sync(SyncArgs),
    /// Invalidate the session
    Logout,
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    #[arg(help = "Redirect url, e.g. http://localhost:3000/auth?token=...")]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct InboxArgs {
    #[arg(long, default_value = "All", help = "Category to show (All, Work, Personal, ...)")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[arg(long, help = "Delay before re-fetching, in milliseconds")]
    pub delay_ms: Option<u64>,
    #[arg(long, help = "Return once the sync request settles, skipping the re-fetch")]
    pub no_wait: bool,
    #[arg(long, default_value = "All", help = "Category to show after the refresh")]
    pub category: String,
}
