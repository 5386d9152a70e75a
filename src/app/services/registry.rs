//! Specification registry: registration and lookup of parse specifications
//!
//! A specification is a named, ordered list of column definitions describing
//! how to slice and store one family of fixed-width data files. Registration
//! is best-effort at the column level: a malformed definition line is logged
//! and skipped without aborting the rest of the specification.
//!
//! Lookups return explicit values threaded by the caller; the registry keeps
//! no resolved state between calls.

use crate::app::models::{ColumnDef, RegisterOutcome, SpecFormat};
use crate::app::services::store::StoreGateway;
use crate::constants::SPEC_HEADER_LINES;
use crate::{Error, Result};
use rusqlite::params;
use tracing::{debug, error};

const LOOKUP_SQL: &str = "SELECT spec_id FROM specification_formats WHERE spec_name = ?1;";

const INSERT_FORMAT_SQL: &str =
    "INSERT INTO specification_formats (spec_name) VALUES (?1) RETURNING spec_id;";

const INSERT_COLUMN_SQL: &str = "INSERT INTO specification_format_columns \
     (spec_id, column_name, column_width, column_data_type) VALUES (?1, ?2, ?3, ?4);";

const COLUMNS_SQL: &str = "SELECT column_id, spec_id, column_name, column_width, column_data_type \
     FROM specification_format_columns WHERE spec_id = ?1 ORDER BY column_id;";

/// Registry over the specification meta tables
pub struct SpecRegistry<'g> {
    store: &'g StoreGateway,
}

impl<'g> SpecRegistry<'g> {
    pub fn new(store: &'g StoreGateway) -> Self {
        Self { store }
    }

    /// Resolve a specification by name
    ///
    /// Returns `None` when no specification of that name is registered.
    pub fn lookup(&self, name: &str) -> Result<Option<SpecFormat>> {
        let ids = self
            .store
            .fetch_all(LOOKUP_SQL, &[&name], |row| row.get::<_, i64>(0))?;
        Ok(ids.into_iter().next().map(|spec_id| SpecFormat {
            spec_id,
            name: name.to_string(),
        }))
    }

    /// Register a new specification from the lines of a specification file
    ///
    /// The first line is a header and is skipped. Each remaining line must
    /// split on commas into exactly three fields: column name, width, data
    /// type. Malformed lines and per-column insert failures are logged and
    /// skipped; previously inserted columns stay in place.
    ///
    /// Fails with a specification error (and performs no column inserts) when
    /// the format insert does not yield an identifier, e.g. on a duplicate
    /// name racing past the caller's existence check.
    pub fn register(&self, name: &str, lines: &[String]) -> Result<RegisterOutcome> {
        let spec_id = self
            .store
            .execute_returning_id(INSERT_FORMAT_SQL, params![name])
            .map_err(|e| {
                Error::specification(format!("could not add specification '{}': {}", name, e))
            })?;
        debug!("Registered specification '{}' as id {}", name, spec_id);

        let mut outcome = RegisterOutcome {
            spec_id,
            ..Default::default()
        };

        for (index, line) in lines.iter().enumerate().skip(SPEC_HEADER_LINES) {
            let Some((column_name, width, data_type)) = parse_column_line(line) else {
                error!(
                    "Invalid specification column at line {} of '{}'",
                    index, name
                );
                outcome.lines_skipped += 1;
                continue;
            };

            match self.store.execute(
                INSERT_COLUMN_SQL,
                params![spec_id, column_name, width, data_type],
            ) {
                Ok(()) => outcome.columns_added += 1,
                Err(e) => {
                    error!(
                        "Cannot add column '{}' to specification '{}': {}",
                        column_name, name, e
                    );
                    outcome.lines_skipped += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Fetch all columns of a specification in registration order
    pub fn columns(&self, spec_id: i64) -> Result<Vec<ColumnDef>> {
        self.store.fetch_all(COLUMNS_SQL, &[&spec_id], |row| {
            Ok(ColumnDef {
                column_id: row.get(0)?,
                spec_id: row.get(1)?,
                name: row.get(2)?,
                width: row.get(3)?,
                data_type: row.get(4)?,
            })
        })
    }
}

/// Parse one column definition line into (name, width, data type)
///
/// Returns `None` unless the line splits into exactly three comma-separated
/// fields with a base-10 integer width.
fn parse_column_line(line: &str) -> Option<(String, i64, String)> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return None;
    }
    let width: i64 = fields[1].trim().parse().ok()?;
    Some((fields[0].to_string(), width, fields[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StoreGateway {
        let store = StoreGateway::in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    fn spec_lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_column_line_valid() {
        assert_eq!(
            parse_column_line("name,10,TEXT"),
            Some(("name".to_string(), 10, "TEXT".to_string()))
        );
    }

    #[test]
    fn test_parse_column_line_missing_comma() {
        assert_eq!(parse_column_line("valid,1BOOLEAN"), None);
    }

    #[test]
    fn test_parse_column_line_extra_field() {
        assert_eq!(parse_column_line("a,1,TEXT,extra"), None);
    }

    #[test]
    fn test_parse_column_line_non_integer_width() {
        assert_eq!(parse_column_line("name,wide,TEXT"), None);
    }

    #[test]
    fn test_lookup_absent() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        assert!(registry.lookup("fileformat1").unwrap().is_none());
    }

    #[test]
    fn test_register_then_lookup() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&[
            "\"column name\",width,datatype",
            "name,10,TEXT",
            "valid,1,BOOLEAN",
            "count,3,INTEGER",
        ]);

        let outcome = registry.register("fileformat1", &lines).unwrap();
        assert_eq!(outcome.columns_added, 3);
        assert_eq!(outcome.lines_skipped, 0);

        let spec = registry.lookup("fileformat1").unwrap().unwrap();
        assert_eq!(spec.spec_id, outcome.spec_id);
        assert_eq!(spec.name, "fileformat1");
    }

    #[test]
    fn test_columns_preserve_registration_order() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&[
            "\"column name\",width,datatype",
            "name,10,TEXT",
            "valid,1,BOOLEAN",
            "count,3,INTEGER",
        ]);
        let outcome = registry.register("fileformat1", &lines).unwrap();

        let columns = registry.columns(outcome.spec_id).unwrap();
        let summary: Vec<(&str, i64, &str)> = columns
            .iter()
            .map(|c| (c.name.as_str(), c.width, c.data_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("name", 10, "TEXT"),
                ("valid", 1, "BOOLEAN"),
                ("count", 3, "INTEGER"),
            ]
        );
    }

    #[test]
    fn test_register_skips_malformed_line_keeps_order() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&[
            "\"column name\",width,datatype",
            "name,10,TEXT",
            "valid,1BOOLEAN",
            "count,3,INTEGER",
        ]);

        let outcome = registry.register("fileformat1", &lines).unwrap();
        assert_eq!(outcome.columns_added, 2);
        assert_eq!(outcome.lines_skipped, 1);

        let columns = registry.columns(outcome.spec_id).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "count"]);
    }

    #[test]
    fn test_register_duplicate_name_fails_without_column_inserts() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&["header", "name,10,TEXT"]);
        let first = registry.register("fileformat1", &lines).unwrap();

        let result = registry.register("fileformat1", &lines);
        assert!(matches!(result, Err(Error::Specification { .. })));

        // The existing specification's columns are untouched
        let columns = registry.columns(first.spec_id).unwrap();
        assert_eq!(columns.len(), 1);
        let all_columns = store
            .fetch_all(
                "SELECT column_id FROM specification_format_columns;",
                &[],
                |row| row.get::<_, i64>(0),
            )
            .unwrap();
        assert_eq!(all_columns.len(), 1);
    }

    #[test]
    fn test_register_counts_column_insert_failures_as_skipped() {
        let store = store();
        // Without the columns table every well-formed line fails at insert
        // time rather than at parse time.
        store
            .execute("DROP TABLE specification_format_columns;", &[])
            .unwrap();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&[
            "\"column name\",width,datatype",
            "name,10,TEXT",
            "valid,1,BOOLEAN",
        ]);

        let outcome = registry.register("fileformat1", &lines).unwrap();
        assert_eq!(outcome.columns_added, 0);
        assert_eq!(outcome.lines_skipped, 2);

        // The format row itself went in before the failures
        assert!(registry.lookup("fileformat1").unwrap().is_some());
    }

    #[test]
    fn test_register_header_only_yields_empty_specification() {
        let store = store();
        let registry = SpecRegistry::new(&store);
        let lines = spec_lines(&["\"column name\",width,datatype"]);

        let outcome = registry.register("fileformat1", &lines).unwrap();
        assert_eq!(outcome.columns_added, 0);
        assert!(registry.columns(outcome.spec_id).unwrap().is_empty());
    }
}
