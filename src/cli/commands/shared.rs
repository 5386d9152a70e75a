//! Shared helpers for CLI commands

use crate::app::services::store::StoreGateway;
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_FILE;
use crate::Result;
use std::path::Path;
use tracing::debug;

/// Set up structured logging from the common verbosity flags
pub fn setup_logging(common: &CommonArgs) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fwingest={}", common.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", common.log_level());
}

/// Resolve the effective configuration
///
/// An explicit `--config` path must load successfully. Without one, a
/// `fwingest.toml` in the working directory is used when present; otherwise
/// built-in defaults apply.
pub fn resolve_config(common: &CommonArgs) -> Result<Config> {
    if let Some(path) = &common.config {
        return Config::load(path);
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return Config::load(default_path);
    }
    debug!("No configuration file found; using defaults");
    Ok(Config::default())
}

/// Open the store named by the configuration
pub fn open_store(config: &Config) -> Result<StoreGateway> {
    StoreGateway::open(&config.database.path)
}
