//! Init command: create the specification meta tables

use crate::cli::args::InitArgs;
use crate::cli::commands::shared::{open_store, resolve_config, setup_logging};
use crate::Result;
use tracing::info;

/// Create the meta tables required by the ingestion pipeline
///
/// Idempotent: existing tables are left untouched.
pub fn run_init(args: InitArgs) -> Result<()> {
    setup_logging(&args.common);
    let config = resolve_config(&args.common)?;

    let store = open_store(&config)?;
    store.init_schema()?;

    info!(
        "Store initialized at '{}'",
        config.database.path.display()
    );
    Ok(())
}
