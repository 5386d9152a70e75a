//! Configuration management and validation.
//!
//! Provides the on-disk TOML configuration for the ingestion service:
//! the database location and the watched directories. The `[database]`
//! section is required; absence is a startup-fatal configuration error.

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_DATABASE_FILE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SPEC_DIR,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for the ingestion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relational store connection parameters
    pub database: DatabaseConfig,

    /// Directory watching parameters
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Connection parameters for the relational store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

/// Parameters for the polling directory watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directory watched for new specification files
    #[serde(default = "default_spec_dir")]
    pub spec_dir: PathBuf,

    /// Directory watched for new data files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Seconds between directory polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_spec_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SPEC_DIR)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            spec_dir: default_spec_dir(),
            data_dir: default_data_dir(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from(DEFAULT_DATABASE_FILE),
            },
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A file without a `[database]` section fails with a configuration
    /// error rather than falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "cannot read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        debug!(
            "Loaded configuration from '{}' (database: '{}')",
            path.display(),
            config.database.path.display()
        );
        Ok(config)
    }

    /// Create configuration with a custom database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = path.into();
        self
    }

    /// Create configuration with custom watch directories
    pub fn with_watch_dirs(
        mut self,
        spec_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        self.watch.spec_dir = spec_dir.into();
        self.watch.data_dir = data_dir.into();
        self
    }

    /// Create configuration with a custom poll interval
    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.watch.poll_interval_secs = secs;
        self
    }
}
