use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fanwatch")]
#[command(about = "Follower count history from saved profile page snapshots")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract follower counts from snapshots and append them to the history
    Extract(ExtractArgs),

    /// Print the history summary and growth
    Report(ReportArgs),

    /// Send a message through the configured notifier
    Notify(NotifyArgs),
}

#[derive(Args)]
pub struct HistoryArgs {
    /// History file to read and update
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Output as JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Directory of saved snapshots
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Snapshot file extension
    #[arg(long)]
    pub ext: Option<String>,

    /// Skip snapshots that fail to extract instead of aborting the run
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,

    /// Send the summary through the notifier after the run
    #[arg(long, default_value_t = false)]
    pub notify: bool,

    #[command(flatten)]
    pub output: HistoryArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub output: HistoryArgs,
}

#[derive(Args)]
pub struct NotifyArgs {
    pub subject: String,
    pub body: String,
}
