//! User configuration loaded from a TOML file. Every key is optional; a
//! missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Directory name used beneath the platform config and data dirs.
const APP_NAME: &str = "watchlist";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not locate home directory")]
    NoHomeDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base filter directive for the log file, e.g. `info` or `watchlist=debug`.
    pub log_level: String,
    /// Where rolling log files go. Defaults to `<data dir>/logs`.
    pub log_dir: Option<PathBuf>,
    pub youtube_base_url: String,
    pub spotify_base_url: String,
    /// Ask before deleting from the list screen.
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            youtube_base_url: "https://www.youtube.com/watch?v=".to_string(),
            spotify_base_url: "https://open.spotify.com/track/".to_string(),
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Load from `path`, treating a missing file as an empty one.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log directory, resolved against the platform data dir when unset.
    pub fn resolved_log_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("logs")),
        }
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoHomeDir)
}
