use std::path::PathBuf;

use clap::Parser;

/// Keep track of the movies you want to watch, right in the terminal.
#[derive(Debug, Parser)]
#[command(name = "watchlist", version, about)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start with a few sample movies.
    #[arg(long)]
    pub demo: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
