//! Command implementations for the chainlat CLI
//!
//! This module contains the main command execution logic, progress
//! reporting, and error handling for the CLI interface. Each command is
//! implemented in its own module:
//! - `analyze`: chain timing log reconstruction and reporting
//! - `dasm`: [DASM] per-task end-to-end sample reporting

pub mod analyze;
pub mod dasm;
pub mod shared;

// Re-export the main types and functions for convenient access
pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for chainlat
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.get_command() {
        Commands::Analyze(analyze_args) => analyze::run_analyze(analyze_args).await,
        Commands::Dasm(dasm_args) => dasm::run_dasm(dasm_args).await,
    }
}
