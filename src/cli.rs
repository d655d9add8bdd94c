use clap::Parser;

/// Fetches football fixtures for the configured leagues, filters them
/// against the user's selections, and optionally polls live scores,
/// printing goal increments as they land.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Fixtures date in YYYY-MM-DD format (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Track the filtered fixtures and poll live scores until interrupted
    #[arg(short, long)]
    pub poll: bool,

    /// Earliest kickoff time to keep, HH:MM
    #[arg(long)]
    pub from_time: Option<String>,

    /// Latest kickoff time to keep, HH:MM
    #[arg(long)]
    pub to_time: Option<String>,

    /// Log file path (overrides the config file setting)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Mirror logs to stdout at debug level
    #[arg(long)]
    pub debug: bool,
}
