//! Core library surface for the watchlist TUI.
//!
//! The binary only wires configuration, logging and the terminal together;
//! everything it drives lives here so tests can reach it.
pub mod cli;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod ui;
pub mod watchlist;

pub use config::{Config, ConfigError};
pub use handlers::{AddMovieHandlers, EditorHandlers};
pub use models::{Movie, Watch};
pub use ui::{run_app, App};
pub use watchlist::{DuplicateId, Watchlist};
