//! Application constants for fwingest
//!
//! This module contains file naming conventions, meta-table names, and
//! default values used throughout the ingestion service.

// =============================================================================
// File Naming Conventions
// =============================================================================

/// Extension of specification files; the base name (minus extension) is the
/// specification's unique name
pub const SPEC_FILE_EXTENSION: &str = "csv";

/// Extension of fixed-width data files; the base name is
/// `<specificationName>_<dateStamp>`
pub const DATA_FILE_EXTENSION: &str = "txt";

/// Expected format of the date-stamp portion of a data file name
pub const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";

/// Number of leading header lines in a specification file that carry no
/// column definitions
pub const SPEC_HEADER_LINES: usize = 1;

// =============================================================================
// Meta Tables
// =============================================================================

/// Table holding one row per registered specification
pub const SPEC_FORMATS_TABLE: &str = "specification_formats";

/// Table holding the ordered column definitions of each specification
pub const SPEC_COLUMNS_TABLE: &str = "specification_format_columns";

// =============================================================================
// Defaults
// =============================================================================

/// Configuration file looked up in the working directory when `--config` is
/// not given
pub const DEFAULT_CONFIG_FILE: &str = "fwingest.toml";

/// Database file used when the configuration does not name one
pub const DEFAULT_DATABASE_FILE: &str = "fwingest.db";

/// Directory watched for new specification files
pub const DEFAULT_SPEC_DIR: &str = "specs";

/// Directory watched for new data files
pub const DEFAULT_DATA_DIR: &str = "data";

/// Seconds between directory polls in watch mode
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;
