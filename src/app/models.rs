//! Core data models for specification-driven ingestion
//!
//! The entities here mirror the persisted meta tables: a specification with a
//! unique name, and its ordered column definitions. The outcome structs carry
//! the structured summaries returned by registration and ingestion so callers
//! can assert on best-effort results without scraping logs.

use serde::{Deserialize, Serialize};

/// A registered specification: unique name plus its generated identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFormat {
    /// Generated identifier assigned at registration
    pub spec_id: i64,

    /// Unique specification name (the specification file's base name)
    pub name: String,
}

/// One column definition within a specification
///
/// The sequence of columns defines both the left-to-right parse order in data
/// files and the left-to-right column order in the derived table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Generated identifier; ordering key within a specification
    pub column_id: i64,

    /// Owning specification identifier
    pub spec_id: i64,

    /// Column name as registered; lower-cased when used as a physical
    /// column identifier
    pub name: String,

    /// Number of characters this column occupies in a fixed-width record
    pub width: i64,

    /// Declared data type, passed through verbatim as the physical column's
    /// type declaration
    pub data_type: String,
}

impl ColumnDef {
    /// Physical column identifier in the derived table
    pub fn physical_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Summary of a specification registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterOutcome {
    /// Identifier assigned to the new specification
    pub spec_id: i64,

    /// Column definitions successfully inserted
    pub columns_added: usize,

    /// Definition lines skipped as malformed or rejected by the store
    pub lines_skipped: usize,
}

/// Summary of one data file's ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Whether the backing table was created during this run
    pub table_created: bool,

    /// Lines for which an insert was attempted
    pub rows_attempted: usize,

    /// Lines whose insert failed and was skipped
    pub rows_failed: usize,
}

impl IngestReport {
    /// Rows that made it into the table
    pub fn rows_inserted(&self) -> usize {
        self.rows_attempted - self.rows_failed
    }
}
