//! Binary entry point: read the CLI and config, start file logging, then
//! drive the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use tracing::info;

use watchlist::cli::Cli;
use watchlist::config::{default_config_path, Config};
use watchlist::logging::init_logging;
use watchlist::{run_app, App, Watchlist};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let log_dir = config.resolved_log_dir()?;
    init_logging(&log_dir, &config.log_level, cli.verbose)?;
    info!(config = %config_path.display(), demo = cli.demo, "starting watchlist");

    let list = if cli.demo {
        Watchlist::demo()
    } else {
        Watchlist::default()
    };

    let mut app = App::new(list, config);
    run_app(&mut app)
}
