//! Store gateway: a thin transactional wrapper around the relational backend
//!
//! Exposes parameterized statement execution, safe identifier substitution for
//! table names, and row fetch. Every mutating call runs inside its own
//! transaction scoped strictly to that call: commit on success, rollback on
//! error. No multi-statement transactions span callers.
//!
//! Table names originate from arbitrary input files, so statements that target
//! a dynamically named table carry a `{}` placeholder which is substituted
//! with a quoted identifier here; data values are always bound parameters.
//! String concatenation of either into executable SQL is the one thing this
//! module must never do.

use crate::constants::{SPEC_COLUMNS_TABLE, SPEC_FORMATS_TABLE};
use crate::{Error, Result};
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, params_from_iter};
use std::path::Path;
use tracing::debug;

/// Statements creating the meta tables required by the registry.
///
/// `spec_name` is UNIQUE at the storage layer, so two concurrent registrations
/// of the same name cannot both succeed; the loser surfaces a store error.
const META_SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS specification_formats (
    spec_id INTEGER PRIMARY KEY AUTOINCREMENT,
    spec_name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS specification_format_columns (
    column_id INTEGER PRIMARY KEY AUTOINCREMENT,
    spec_id INTEGER NOT NULL,
    column_name TEXT NOT NULL,
    column_width INTEGER NOT NULL,
    column_data_type TEXT NOT NULL,
    FOREIGN KEY (spec_id)
        REFERENCES specification_formats (spec_id)
        ON DELETE CASCADE
);";

/// Shared connection to the relational store
///
/// The connection is reused across the process lifetime; each logical
/// operation opens and finishes its own transaction. The gateway exposes no
/// internal concurrency: callers must guarantee at most one in-flight
/// operation per instance (the watch loop processes files sequentially).
pub struct StoreGateway {
    conn: Connection,
}

impl StoreGateway {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("cannot open database '{}'", path.display()), e))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::store("cannot enable foreign keys", e))?;
        debug!("Opened store at '{}'", path.display());
        Ok(Self { conn })
    }

    /// Open an in-memory database (used by tests)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store("cannot open in-memory database", e))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::store("cannot enable foreign keys", e))?;
        Ok(Self { conn })
    }

    /// Create the meta tables if they do not exist
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(META_SCHEMA_SQL)
            .map_err(|e| Error::store("cannot create meta tables", e))?;
        debug!(
            "Meta tables ready ({}, {})",
            SPEC_FORMATS_TABLE, SPEC_COLUMNS_TABLE
        );
        Ok(())
    }

    /// Run a parameterized statement inside its own transaction
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::store("cannot begin transaction", e))?;
        tx.execute(sql, params)
            .map_err(|e| Error::store("statement execution failed", e))?;
        tx.commit()
            .map_err(|e| Error::store("commit failed", e))?;
        Ok(())
    }

    /// Run an insert that returns a generated identifier
    ///
    /// Fails with a store error if the statement fails or no row is returned.
    pub fn execute_returning_id(&self, sql: &str, params: &[&dyn ToSql]) -> Result<i64> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::store("cannot begin transaction", e))?;
        let id: i64 = tx
            .query_row(sql, params, |row| row.get(0))
            .map_err(|e| Error::store("insert did not return an identifier", e))?;
        tx.commit()
            .map_err(|e| Error::store("commit failed", e))?;
        Ok(id)
    }

    /// Run a query and return all result rows through the given row mapper
    pub fn fetch_all<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| Error::store("cannot prepare query", e))?;
        let rows = stmt
            .query_map(params, map)
            .map_err(|e| Error::store("query execution failed", e))?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| Error::store("row fetch failed", e))?);
        }
        Ok(results)
    }

    /// Probe whether the named table can be read
    ///
    /// Runs a bounded `SELECT ... LIMIT 1` against the quoted table name. Any
    /// failure, including "no such table", yields `false` rather than an
    /// error: the only failure mode distinguishable here is "cannot read",
    /// which is equivalent to "does not exist" for this use case.
    pub fn table_exists(&self, table_name: &str) -> bool {
        let sql = substitute_table("SELECT * FROM {} LIMIT 1;", table_name);
        match self.conn.prepare(&sql) {
            Ok(mut stmt) => match stmt.query([]) {
                Ok(mut rows) => rows.next().is_ok(),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    /// Execute a `CREATE TABLE` statement against the named table
    ///
    /// The statement template carries a `{}` placeholder for the table name,
    /// which is substituted via identifier quoting.
    pub fn create_table(&self, template: &str, table_name: &str) -> Result<()> {
        let sql = substitute_table(template, table_name);
        self.execute(&sql, &[])?;
        debug!("Created table '{}'", table_name);
        Ok(())
    }

    /// Insert one row of values into the named table
    ///
    /// The statement template carries a `{}` placeholder for the table name
    /// and one positional placeholder per value; all values are bound.
    pub fn insert_row(&self, template: &str, table_name: &str, values: &[String]) -> Result<()> {
        let sql = substitute_table(template, table_name);
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::store("cannot begin transaction", e))?;
        tx.execute(&sql, params_from_iter(values.iter()))
            .map_err(|e| Error::store("row insert failed", e))?;
        tx.commit()
            .map_err(|e| Error::store("commit failed", e))?;
        Ok(())
    }
}

/// Quote an identifier for safe inclusion in a statement
///
/// Standard SQL identifier quoting: wrap in double quotes, doubling any
/// embedded double quote. Never bypassed for user-supplied table names.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Substitute the quoted table name into a statement template's `{}` slot
fn substitute_table(template: &str, table_name: &str) -> String {
    template.replacen("{}", &quote_ident(table_name), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn store() -> StoreGateway {
        let store = StoreGateway::in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    #[test]
    fn test_quote_ident_plain() {
        assert_eq!(quote_ident("fileformat1"), "\"fileformat1\"");
    }

    #[test]
    fn test_quote_ident_escapes_embedded_quotes() {
        assert_eq!(quote_ident("bad\"name"), "\"bad\"\"name\"");
    }

    #[test]
    fn test_substitute_table() {
        assert_eq!(
            substitute_table("SELECT * FROM {} LIMIT 1;", "fileformat1"),
            "SELECT * FROM \"fileformat1\" LIMIT 1;"
        );
    }

    #[test]
    fn test_table_exists_false_then_true() {
        let store = store();
        assert!(!store.table_exists("fileformat1"));

        store
            .create_table("CREATE TABLE {} (\nname TEXT);", "fileformat1")
            .unwrap();
        assert!(store.table_exists("fileformat1"));
    }

    #[test]
    fn test_table_exists_true_for_empty_table() {
        let store = store();
        store
            .create_table("CREATE TABLE {} (\nname TEXT);", "empty_table")
            .unwrap();
        // An empty but readable table still exists
        assert!(store.table_exists("empty_table"));
    }

    #[test]
    fn test_execute_returning_id_generates_sequence() {
        let store = store();
        let first = store
            .execute_returning_id(
                "INSERT INTO specification_formats (spec_name) VALUES (?1) RETURNING spec_id;",
                params!["fileformat1"],
            )
            .unwrap();
        let second = store
            .execute_returning_id(
                "INSERT INTO specification_formats (spec_name) VALUES (?1) RETURNING spec_id;",
                params!["fileformat2"],
            )
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_duplicate_spec_name_rejected_by_storage_layer() {
        let store = store();
        store
            .execute_returning_id(
                "INSERT INTO specification_formats (spec_name) VALUES (?1) RETURNING spec_id;",
                params!["fileformat1"],
            )
            .unwrap();

        let result = store.execute_returning_id(
            "INSERT INTO specification_formats (spec_name) VALUES (?1) RETURNING spec_id;",
            params!["fileformat1"],
        );
        assert!(matches!(result, Err(crate::Error::Store { .. })));
    }

    #[test]
    fn test_failed_statement_leaves_store_usable() {
        let store = store();
        let result = store.execute("INSERT INTO no_such_table VALUES (?1);", &[&"x"]);
        assert!(result.is_err());

        // The shared connection survives a rolled-back call
        let rows = store
            .fetch_all(
                "SELECT spec_id FROM specification_formats;",
                &[],
                |row| row.get::<_, i64>(0),
            )
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_insert_row_binds_values() {
        let store = store();
        store
            .create_table(
                "CREATE TABLE {} (\nname TEXT,\ncount INTEGER);",
                "fileformat1",
            )
            .unwrap();
        store
            .insert_row(
                "INSERT INTO {} VALUES (?, ?);",
                "fileformat1",
                &["Alice".to_string(), "5".to_string()],
            )
            .unwrap();

        let rows = store
            .fetch_all(
                "SELECT name, CAST(count AS TEXT) FROM \"fileformat1\";",
                &[],
                |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                },
            )
            .unwrap();
        assert_eq!(rows, vec![("Alice".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_hostile_table_name_is_inert() {
        let store = store();
        // A table name carrying quoting and a piggybacked statement is treated
        // as a single (strange) identifier, not executable SQL.
        let hostile = "x\"; DROP TABLE specification_formats; --";
        assert!(!store.table_exists(hostile));

        store
            .create_table("CREATE TABLE {} (\nname TEXT);", hostile)
            .unwrap();
        assert!(store.table_exists(hostile));
        // Meta tables untouched
        assert!(store.table_exists("specification_formats"));
    }
}
