//! Polling directory watcher for specification and data files
//!
//! Scans the configured spec and data directories on a fixed interval and
//! dispatches files that appeared since the previous scan: `.csv` files to the
//! specification handler, `.txt` files to the data handler. Files already
//! present when the watcher starts are recorded as seen and not re-ingested.
//!
//! Dispatch errors abort that file only; the watch loop itself never stops on
//! an ingestion failure.

use crate::app::adapters::dispatch::{handle_data_file, handle_spec_file};
use crate::app::services::store::StoreGateway;
use crate::constants::{DATA_FILE_EXTENSION, SPEC_FILE_EXTENSION};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Watcher over one spec directory and one data directory
pub struct DirectoryWatcher {
    store: StoreGateway,
    spec_dir: PathBuf,
    data_dir: PathBuf,
    poll_interval: Duration,
    seen: HashSet<PathBuf>,
}

impl DirectoryWatcher {
    pub fn new(
        store: StoreGateway,
        spec_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            spec_dir: spec_dir.into(),
            data_dir: data_dir.into(),
            poll_interval,
            seen: HashSet::new(),
        }
    }

    /// Run the watch loop until the token is cancelled
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        // Pre-existing files are event history, not new deliveries
        let preexisting = self.mark_existing_as_seen();
        info!(
            "Watching '{}' (specs) and '{}' (data), {} pre-existing files ignored",
            self.spec_dir.display(),
            self.data_dir.display(),
            preexisting
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Watcher shutting down");
                    return Ok(());
                }
                _ = interval.tick() => {
                    self.poll_once();
                }
            }
        }
    }

    /// Record currently present files without dispatching them
    fn mark_existing_as_seen(&mut self) -> usize {
        let mut count = 0;
        for dir in [self.spec_dir.clone(), self.data_dir.clone()] {
            for path in list_files(&dir) {
                if self.seen.insert(path) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Scan both directories once, dispatching newly appeared files
    ///
    /// The spec directory is scanned first so a specification dropped
    /// together with its data file wins the race.
    pub fn poll_once(&mut self) {
        for path in list_files(&self.spec_dir) {
            if !self.seen.insert(path.clone()) {
                continue;
            }
            if !has_extension(&path, SPEC_FILE_EXTENSION) {
                debug!("Ignoring non-specification file '{}'", path.display());
                continue;
            }
            if let Err(e) = handle_spec_file(&self.store, &path) {
                error!("Specification file '{}' not processed: {}", path.display(), e);
            }
        }

        for path in list_files(&self.data_dir) {
            if !self.seen.insert(path.clone()) {
                continue;
            }
            if !has_extension(&path, DATA_FILE_EXTENSION) {
                debug!("Ignoring non-data file '{}'", path.display());
                continue;
            }
            if let Err(e) = handle_data_file(&self.store, &path) {
                error!("Data file '{}' not processed: {}", path.display(), e);
            }
        }
    }
}

/// List the regular files directly inside a directory
///
/// A missing or unreadable directory yields no entries; the watcher keeps
/// polling rather than failing.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
