//! Load command: one-shot ingestion of a single file
//!
//! The file's extension decides the pipeline: `.csv` registers a
//! specification, `.txt` ingests a data file.

use crate::app::adapters::dispatch::{handle_data_file, handle_spec_file};
use crate::cli::args::LoadArgs;
use crate::cli::commands::shared::{open_store, resolve_config, setup_logging};
use crate::constants::{DATA_FILE_EXTENSION, SPEC_FILE_EXTENSION};
use crate::{Error, Result};

/// Dispatch a single file through the ingestion pipeline
pub fn run_load(args: LoadArgs) -> Result<()> {
    setup_logging(&args.common);
    let config = resolve_config(&args.common)?;
    let store = open_store(&config)?;

    let extension = args
        .file
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        SPEC_FILE_EXTENSION => {
            handle_spec_file(&store, &args.file)?;
            Ok(())
        }
        DATA_FILE_EXTENSION => {
            handle_data_file(&store, &args.file)?;
            Ok(())
        }
        _ => Err(Error::invalid_file_name(
            args.file.display().to_string(),
            format!(
                "expected a .{} specification file or a .{} data file",
                SPEC_FILE_EXTENSION, DATA_FILE_EXTENSION
            ),
        )),
    }
}
