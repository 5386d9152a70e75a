//! Schema/row engine: create-or-insert pipeline for fixed-width data files
//!
//! Given a registered specification, the engine creates the backing table on
//! first use, slices each line of the data file into fixed-width fields per
//! the specification's column widths, and inserts one row per line. Ingestion
//! is best-effort: a row-level insert failure is logged and does not abort
//! the remaining lines.

use crate::app::models::{ColumnDef, IngestReport};
use crate::app::services::registry::SpecRegistry;
use crate::app::services::store::StoreGateway;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info};

/// Stateless engine over the store gateway; one `process` call per data file
pub struct IngestEngine<'g> {
    store: &'g StoreGateway,
}

impl<'g> IngestEngine<'g> {
    pub fn new(store: &'g StoreGateway) -> Self {
        Self { store }
    }

    /// Run the full create-or-insert pipeline for one data file
    ///
    /// Fails with `MissingSpecification` when the name is not registered and
    /// with a schema error when the specification has no resolvable columns;
    /// both abort before any mutating store call. Returns a structured
    /// summary of attempted and failed rows.
    pub fn process(&self, spec_name: &str, path: &Path) -> Result<IngestReport> {
        let registry = SpecRegistry::new(self.store);
        let spec = registry
            .lookup(spec_name)?
            .ok_or_else(|| Error::missing_specification(spec_name))?;

        let mut report = IngestReport::default();

        let columns = registry.columns(spec.spec_id)?;
        if !self.store.table_exists(spec_name) {
            if columns.is_empty() {
                return Err(Error::schema(
                    "invalid specification; cannot add data format table",
                ));
            }
            let create_sql = build_create_sql(&columns);
            self.store
                .create_table(&create_sql, spec_name)
                .map_err(|e| match e {
                    Error::Store { source, .. } => Error::schema_with_source(
                        format!("cannot create table '{}'", spec_name),
                        source,
                    ),
                    other => other,
                })?;
            report.table_created = true;
            info!("Created data table '{}'", spec_name);
        }

        if columns.is_empty() {
            return Err(Error::schema(
                "invalid specification; cannot add data format rows",
            ));
        }

        let insert_sql = build_insert_sql(columns.len());
        let file = File::open(path)
            .map_err(|e| Error::io(format!("cannot open data file '{}'", path.display()), e))?;

        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|e| Error::io(format!("cannot read data file '{}'", path.display()), e))?;
            let values = split_fixed_width(&line, &columns);

            report.rows_attempted += 1;
            if let Err(e) = self.store.insert_row(&insert_sql, spec_name, &values) {
                error!(
                    "Row {} of '{}' not inserted: {}",
                    report.rows_attempted,
                    path.display(),
                    e
                );
                report.rows_failed += 1;
            }
        }

        debug!(
            "Processed '{}': {} rows attempted, {} failed",
            path.display(),
            report.rows_attempted,
            report.rows_failed
        );
        Ok(report)
    }
}

/// Derive the `CREATE TABLE` statement template from a column list
///
/// Column names are lower-cased and kept in registration order; declared data
/// types pass through verbatim. The table name stays a `{}` placeholder for
/// the gateway to substitute with a quoted identifier.
pub fn build_create_sql(columns: &[ColumnDef]) -> String {
    let mut create_sql = String::from("CREATE TABLE {} (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            create_sql.push(',');
        }
        create_sql.push('\n');
        create_sql.push_str(&column.physical_name());
        create_sql.push(' ');
        create_sql.push_str(&column.data_type);
    }
    create_sql.push_str(");");
    create_sql
}

/// Derive the insert statement template with one placeholder per column
pub fn build_insert_sql(column_count: usize) -> String {
    let placeholders = vec!["?"; column_count].join(", ");
    format!("INSERT INTO {{}} VALUES ({});", placeholders)
}

/// Slice one fixed-width line into trimmed field values
///
/// Walks the columns left to right with a running character offset. A line
/// shorter than the cumulative width yields truncated or empty trailing
/// fields rather than an error; non-positive widths yield empty fields.
pub fn split_fixed_width(line: &str, columns: &[ColumnDef]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut values = Vec::with_capacity(columns.len());
    let mut offset = 0usize;

    for column in columns {
        let width = column.width.max(0) as usize;
        let start = offset.min(chars.len());
        let end = (offset + width).min(chars.len());
        let field: String = chars[start..end].iter().collect();
        values.push(field.trim().to_string());
        offset += width;
    }

    values
}
