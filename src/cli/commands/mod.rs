//! Command implementations for the fwingest CLI
//!
//! Each subcommand is implemented in its own module; this module dispatches
//! to the appropriate handler based on the parsed arguments.

pub mod init;
pub mod load;
pub mod shared;
pub mod watch;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Main command runner for the fwingest CLI
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Init(init_args)) => init::run_init(init_args),
        Some(Commands::Watch(watch_args)) => watch::run_watch(watch_args, cancel).await,
        Some(Commands::Load(load_args)) => load::run_load(load_args),
        None => Err(Error::configuration("no command given; see --help")),
    }
}
