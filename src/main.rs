// file: src/main.rs
// version: 1.0.0
// guid: b24efe35-37ea-4992-9c0d-03089ec7bca7

//! DFS delegation - Main entry point

use clap::Parser;
use dfs_delegation::{cli::Cli, cli::delegate_command, logging::logger, Result};
use tokio::signal;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logger::init_logger(cli.verbose, cli.quiet)?;
    debug!("dfs-delegate {} starting", dfs_delegation::VERSION);

    tokio::select! {
        result = delegate_command(&cli) => {
            result?;
            debug!("dfs-delegate finished");
            Ok(())
        }
        _ = signal::ctrl_c() => {
            warn!("Interrupted by user, the remaining ACE operations were not attempted");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}
