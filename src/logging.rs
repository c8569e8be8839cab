//! File-backed tracing setup. The terminal belongs to the TUI, so log lines
//! always go to a daily rolling file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Prefix for rotated files: `watchlist.log.2024-05-01`, ...
const LOG_PREFIX: &str = "watchlist.log";

/// Pick the filter directive: `-v` raises to at least debug, `-vv` and above
/// to trace. A configured level that is already as verbose is kept.
pub fn filter_directive(base_level: &str, verbose_level: u8) -> String {
    let (requested, directive) = match verbose_level {
        0 => return base_level.to_string(),
        1 => (LevelFilter::DEBUG, "debug"),
        _ => (LevelFilter::TRACE, "trace"),
    };
    match base_level.parse::<LevelFilter>() {
        Ok(configured) if configured >= requested => base_level.to_string(),
        _ => directive.to_string(),
    }
}

pub fn init_logging(log_dir: &Path, base_level: &str, verbose_level: u8) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    // RUST_LOG wins over everything else.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(base_level, verbose_level)));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_PREFIX);
    let fmt_layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_writer(file_appender);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to install tracing subscriber")
}
