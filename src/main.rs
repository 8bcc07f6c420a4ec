use chainlat::cli::{args::Args, commands};
use clap::Parser;
use std::process;

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
        // Run the main command, aborting cleanly on Ctrl+C
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to install CTRL+C signal handler: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(chainlat::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
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
    println!("Chainlat - Task-Chain Latency Log Analyzer");
    println!("==========================================");
    println!();
    println!("Reconstruct per-identifier latency records from task-chain pipeline");
    println!("logs and report end-to-end latency statistics and histograms.");
    println!();
    println!("USAGE:");
    println!("    chainlat <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    analyze     Analyze chain timing logs (main command)");
    println!("    dasm        Analyze [DASM] per-task end-to-end latency samples");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Analyze a single chain log with default 10 us bins:");
    println!("    chainlat analyze \"log_Chain 3_tcp.txt\"");
    println!();
    println!("    # Analyze every chain log in a capture directory with a known period:");
    println!("    chainlat analyze ./captures --pattern \"log_*_tcp.txt\" --period-ms 33");
    println!();
    println!("    # Per-task DASM latency summary:");
    println!("    chainlat dasm dasm_log.txt --tasks SFM,Lane,Detection");
    println!();
    println!("For detailed help on any command, use:");
    println!("    chainlat <COMMAND> --help");
}
