//! Watch command: poll the spec and data directories and ingest new files

use crate::app::adapters::watcher::DirectoryWatcher;
use crate::cli::args::WatchArgs;
use crate::cli::commands::shared::{open_store, resolve_config, setup_logging};
use crate::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run the polling watcher until cancelled
pub async fn run_watch(args: WatchArgs, cancel: CancellationToken) -> Result<()> {
    setup_logging(&args.common);
    let config = resolve_config(&args.common)?;

    let spec_dir = args
        .spec_dir
        .unwrap_or_else(|| config.watch.spec_dir.clone());
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| config.watch.data_dir.clone());
    let poll_interval = Duration::from_secs(
        args.poll_interval_secs
            .unwrap_or(config.watch.poll_interval_secs),
    );

    let store = open_store(&config)?;
    let mut watcher = DirectoryWatcher::new(store, spec_dir, data_dir, poll_interval);
    watcher.run(cancel).await
}
