//! Command-line argument definitions for fwingest
//!
//! This module defines the CLI interface using the clap derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the fixed-width file ingestion service
///
/// Loads fixed-width text data files into a relational store, driven by
/// specification files that describe each data file's column layout.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fwingest",
    version,
    about = "Load fixed-width data files into a relational store using specification files",
    long_about = "A service that ingests fixed-width text data files into a relational store. \
                  Specification files (name,width,type per line) describe each data file \
                  family's column layout; the matching table is derived from the specification \
                  and created on first use. Run 'init' once to create the meta tables, then \
                  'watch' to process files as they appear, or 'load' for one-shot ingestion."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create the specification meta tables in the configured database
    Init(InitArgs),
    /// Watch the spec and data directories and ingest files as they appear
    Watch(WatchArgs),
    /// Ingest a single specification or data file and exit
    Load(LoadArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Path to the TOML configuration file
    ///
    /// Defaults to ./fwingest.toml when present; built-in defaults otherwise.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level directive derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Arguments for the init command
#[derive(Debug, Clone, Parser)]
pub struct InitArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the watch command
#[derive(Debug, Clone, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory watched for new specification files (overrides configuration)
    #[arg(long = "specs", value_name = "PATH")]
    pub spec_dir: Option<PathBuf>,

    /// Directory watched for new data files (overrides configuration)
    #[arg(long = "data", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Seconds between directory polls (overrides configuration)
    #[arg(long = "interval", value_name = "SECS")]
    pub poll_interval_secs: Option<u64>,
}

/// Arguments for the load command
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// File to ingest: a .csv specification file or a .txt data file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_with_overrides() {
        let args = Args::parse_from([
            "fwingest", "watch", "--specs", "incoming/specs", "--data", "incoming/data",
            "--interval", "3",
        ]);
        match args.command {
            Some(Commands::Watch(watch)) => {
                assert_eq!(watch.spec_dir, Some(PathBuf::from("incoming/specs")));
                assert_eq!(watch.data_dir, Some(PathBuf::from("incoming/data")));
                assert_eq!(watch.poll_interval_secs, Some(3));
            }
            other => panic!("expected watch command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_load_requires_file() {
        assert!(Args::try_parse_from(["fwingest", "load"]).is_err());

        let args = Args::parse_from(["fwingest", "load", "specs/fileformat1.csv"]);
        match args.command {
            Some(Commands::Load(load)) => {
                assert_eq!(load.file, PathBuf::from("specs/fileformat1.csv"));
            }
            other => panic!("expected load command, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_from_flags() {
        let args = Args::parse_from(["fwingest", "init", "--verbose"]);
        let Some(Commands::Init(init)) = args.command else {
            panic!("expected init command");
        };
        assert_eq!(init.common.log_level(), "debug");

        let args = Args::parse_from(["fwingest", "init", "--quiet"]);
        let Some(Commands::Init(init)) = args.command else {
            panic!("expected init command");
        };
        assert_eq!(init.common.log_level(), "error");
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["fwingest", "init", "-v", "-q"]).is_err());
    }
}
