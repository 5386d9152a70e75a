//! Dispatch of file-appearance events to the registry and ingest engine
//!
//! Specification files are registered under their base name (extension
//! stripped); re-delivery of an already-registered name is a logged no-op.
//! Data files carry a `<specName>_<dateStamp>` base name; the date stamp is
//! extracted and sanity-checked but not stored.

use crate::app::models::{IngestReport, RegisterOutcome};
use crate::app::services::ingest::IngestEngine;
use crate::app::services::registry::SpecRegistry;
use crate::app::services::store::StoreGateway;
use crate::constants::DATE_STAMP_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Handle a newly appeared specification file
///
/// Returns `None` when a specification of that name already exists (the
/// re-delivery no-op), otherwise the registration outcome.
pub fn handle_spec_file(store: &StoreGateway, path: &Path) -> Result<Option<RegisterOutcome>> {
    let name = file_stem(path)?;
    let registry = SpecRegistry::new(store);

    if registry.lookup(&name)?.is_some() {
        info!("Specification '{}' already exists; skipping", name);
        return Ok(None);
    }

    let lines = read_lines(path)?;
    let outcome = registry.register(&name, &lines)?;
    info!(
        "Specification successfully added: '{}' ({} columns, {} lines skipped)",
        name, outcome.columns_added, outcome.lines_skipped
    );
    Ok(Some(outcome))
}

/// Handle a newly appeared data file
pub fn handle_data_file(store: &StoreGateway, path: &Path) -> Result<IngestReport> {
    let (spec_name, date_stamp) = parse_data_file_name(path)?;

    if NaiveDate::parse_from_str(&date_stamp, DATE_STAMP_FORMAT).is_err() {
        warn!(
            "Data file '{}' has a malformed date stamp '{}'",
            path.display(),
            date_stamp
        );
    }

    let engine = IngestEngine::new(store);
    let report = engine.process(&spec_name, path)?;
    info!(
        "Data successfully added: '{}' ({} rows inserted, {} failed)",
        path.display(),
        report.rows_inserted(),
        report.rows_failed
    );
    Ok(report)
}

/// Split a data file's base name into specification name and date stamp
///
/// The split happens at the first underscore; a base name without one does
/// not follow the naming convention and is rejected.
pub fn parse_data_file_name(path: &Path) -> Result<(String, String)> {
    let stem = file_stem(path)?;
    stem.split_once('_')
        .map(|(name, stamp)| (name.to_string(), stamp.to_string()))
        .ok_or_else(|| {
            Error::invalid_file_name(
                path.display().to_string(),
                "expected '<specName>_<dateStamp>'",
            )
        })
}

/// Base name of a file with its extension stripped
fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| Error::invalid_file_name(path.display().to_string(), "no base name"))
}

/// Read a file as a sequence of lines stripped of line endings
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("cannot open file '{}'", path.display()), e))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        lines.push(
            line.map_err(|e| Error::io(format!("cannot read file '{}'", path.display()), e))?,
        );
    }
    Ok(lines)
}
