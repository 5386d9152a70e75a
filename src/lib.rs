//! fwingest library
//!
//! A Rust library for loading fixed-width text data files into a relational
//! store, driven by externally supplied specification files that describe each
//! data file's column layout.
//!
//! This library provides tools for:
//! - Registering specifications (column name, width, data type) under a unique name
//! - Deriving a table schema from a specification and creating it lazily
//! - Parsing fixed-width records against a specification's column widths
//! - Loading parsed rows into the derived table with best-effort semantics
//! - Watching spec/data directories and dispatching newly appeared files

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod ingest;
        pub mod registry;
        pub mod store;
    }
    pub mod adapters {
        pub mod dispatch;
        pub mod watcher;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ColumnDef, IngestReport, RegisterOutcome, SpecFormat};
pub use config::Config;

/// Result type alias for fwingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for ingestion operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Relational backend failure (query, insert, create, or fetch failed)
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Specification registration could not obtain an identifier
    #[error("Specification error: {message}")]
    Specification { message: String },

    /// Table creation failed or was attempted against missing/empty column metadata
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// A data file references a specification name not present in the registry
    #[error("Specification does not exist: {name}")]
    MissingSpecification { name: String },

    /// A file name does not follow the expected naming convention
    #[error("Invalid file name '{path}': {reason}")]
    InvalidFileName { path: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Store {
            message: message.into(),
            source,
        }
    }

    /// Create a specification error
    pub fn specification(message: impl Into<String>) -> Self {
        Self::Specification {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            source: None,
        }
    }

    /// Create a schema error carrying the underlying store failure
    pub fn schema_with_source(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Schema {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a missing-specification error
    pub fn missing_specification(name: impl Into<String>) -> Self {
        Self::MissingSpecification { name: name.into() }
    }

    /// Create an invalid-file-name error
    pub fn invalid_file_name(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFileName {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing-interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store {
            message: "Store operation failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("invalid configuration file: {}", error),
        }
    }
}
