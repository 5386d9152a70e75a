use clap::Parser;
use fwingest::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(fwingest::Error::interrupted(
                    "Processing interrupted by user".to_string(),
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("fwingest - Fixed-Width File Ingestion Service");
    println!("=============================================");
    println!();
    println!("Load fixed-width text data files into a relational store, driven by");
    println!("specification files that describe each data file's column layout.");
    println!();
    println!("USAGE:");
    println!("    fwingest <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    init        Create the specification meta tables");
    println!("    watch       Watch the spec/data directories and ingest new files");
    println!("    load        Ingest a single specification or data file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Initialize the database named in fwingest.toml:");
    println!("    fwingest init");
    println!();
    println!("    # Watch directories with a 2-second poll interval:");
    println!("    fwingest watch --specs specs --data data --interval 2");
    println!();
    println!("    # Register a specification, then load a matching data file:");
    println!("    fwingest load specs/fileformat1.csv");
    println!("    fwingest load data/fileformat1_2015-06-28.txt");
    println!();
    println!("For detailed help on any command, use:");
    println!("    fwingest <COMMAND> --help");
}
