//! Command-line argument definitions for chainlat
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::constants::{DASM_DEFAULT_BIN_WIDTH_US, DEFAULT_BIN_WIDTH_US, DEFAULT_LOG_PATTERN};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the chainlat latency log analyzer
///
/// Reconstructs per-identifier latency records from task-chain pipeline logs
/// and reports end-to-end latency, execution time, and waiting time
/// statistics with histograms.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chainlat",
    version,
    about = "Analyze task-chain latency logs into statistics and histograms",
    long_about = "A tool that reconstructs per-identifier latency records from the \
                  interleaved log files written by a bare-metal task-chain pipeline, \
                  computes end-to-end latency, execution time, and waiting time, and \
                  renders statistical summaries and histograms. Incomplete records at \
                  end of stream are reported instead of silently dropped."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for chainlat
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Analyze chain timing logs (default command)
    Analyze(AnalyzeArgs),
    /// Analyze [DASM] per-task end-to-end latency samples
    Dasm(DasmArgs),
}

/// Arguments for the analyze command (chain timing logs)
#[derive(Debug, Clone, Parser)]
pub struct AnalyzeArgs {
    /// Chain log files, directories, or glob patterns to analyze
    ///
    /// Each file is an independent analysis. Directories are scanned for
    /// files matching --pattern; glob patterns are expanded in place.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Output directory for exported histogram CSV files
    ///
    /// Will be created if it doesn't exist. Defaults to the directory of
    /// each analyzed log file.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for histogram CSV files"
    )]
    pub output_path: Option<PathBuf>,

    /// Histogram bin width in microseconds
    #[arg(
        long = "bin-width",
        value_name = "US",
        default_value_t = DEFAULT_BIN_WIDTH_US,
        help = "Histogram bin width in microseconds"
    )]
    pub bin_width_us: f64,

    /// Pipeline period in milliseconds
    ///
    /// When given, the report includes the estimated capture duration
    /// (completed records x period).
    #[arg(
        long = "period-ms",
        value_name = "MS",
        help = "Pipeline period in milliseconds for the capture-duration estimate"
    )]
    pub period_ms: Option<f64>,

    /// Glob pattern for scanning directories
    #[arg(
        long = "pattern",
        value_name = "GLOB",
        default_value = DEFAULT_LOG_PATTERN,
        help = "Filename pattern used when an input is a directory"
    )]
    pub pattern: String,

    /// Number of parallel workers
    ///
    /// Controls how many log files are analyzed concurrently.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of log files to analyze concurrently"
    )]
    pub workers: Option<usize>,

    /// Export the derived metric triples of every completed record as CSV
    #[arg(
        long = "dump-records",
        value_name = "FILE",
        help = "Write per-record derived metrics to a CSV file"
    )]
    pub dump_records: Option<PathBuf>,

    /// Skip exporting histogram CSV files
    #[arg(long = "no-save", help = "Print histograms without writing CSV files")]
    pub no_save: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the dasm command ([DASM] per-task samples)
#[derive(Debug, Clone, Parser)]
pub struct DasmArgs {
    /// DASM log files to analyze
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Histogram bin width in microseconds
    #[arg(
        long = "bin-width",
        value_name = "US",
        default_value_t = DASM_DEFAULT_BIN_WIDTH_US,
        help = "Histogram bin width in microseconds"
    )]
    pub bin_width_us: f64,

    /// Only report these tasks (comma-separated list)
    ///
    /// By default every task found in the log is reported.
    #[arg(
        long = "tasks",
        value_name = "LIST",
        help = "Comma-separated list of task names to report"
    )]
    pub tasks: Option<TaskList>,

    /// Output directory for exported histogram CSV files
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for histogram CSV files"
    )]
    pub output_path: Option<PathBuf>,

    /// Skip exporting histogram CSV files
    #[arg(long = "no-save", help = "Print histograms without writing CSV files")]
    pub no_save: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Wrapper for parsing comma-separated task lists
#[derive(Debug, Clone)]
pub struct TaskList {
    pub tasks: Vec<String>,
}

impl FromStr for TaskList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tasks: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if tasks.is_empty() {
            return Err(Error::data_validation(
                "Task list cannot be empty".to_string(),
            ));
        }

        Ok(TaskList { tasks })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl AnalyzeArgs {
    /// Validate the analyze command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.bin_width_us <= 0.0 {
            return Err(Error::configuration(
                "Histogram bin width must be positive".to_string(),
            ));
        }

        if let Some(period) = self.period_ms
            && period <= 0.0
        {
            return Err(Error::configuration(
                "Pipeline period must be positive".to_string(),
            ));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0".to_string(),
                ));
            }
            if workers > 100 {
                return Err(Error::configuration(
                    "Number of workers cannot exceed 100".to_string(),
                ));
            }
        }

        if self.pattern.trim().is_empty() {
            return Err(Error::configuration(
                "Scan pattern cannot be empty".to_string(),
            ));
        }

        // Validate dump target directory exists if specified
        if let Some(dump_path) = &self.dump_records
            && let Some(parent) = dump_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            return Err(Error::configuration(format!(
                "Dump file directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl DasmArgs {
    /// Validate the dasm command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.bin_width_us <= 0.0 {
            return Err(Error::configuration(
                "Histogram bin width must be positive".to_string(),
            ));
        }

        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::file_not_found(input.display().to_string()));
            }
        }

        Ok(())
    }

    /// Get the task filter if one was specified
    pub fn get_tasks(&self) -> Option<Vec<String>> {
        self.tasks.as_ref().map(|list| list.tasks.clone())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args() -> AnalyzeArgs {
        AnalyzeArgs {
            inputs: vec!["log_Chain 3_tcp.txt".to_string()],
            output_path: None,
            bin_width_us: DEFAULT_BIN_WIDTH_US,
            period_ms: None,
            pattern: DEFAULT_LOG_PATTERN.to_string(),
            workers: None,
            dump_records: None,
            no_save: false,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_task_list_parsing() {
        let result = TaskList::from_str("SFM").unwrap();
        assert_eq!(result.tasks, vec!["SFM"]);

        let result = TaskList::from_str("SFM, Lane ,Detection").unwrap();
        assert_eq!(result.tasks, vec!["SFM", "Lane", "Detection"]);

        assert!(TaskList::from_str("").is_err());
        assert!(TaskList::from_str(",,,").is_err());
    }

    #[test]
    fn test_analyze_args_validation() {
        assert!(analyze_args().validate().is_ok());

        let mut invalid = analyze_args();
        invalid.bin_width_us = 0.0;
        assert!(invalid.validate().is_err());

        let mut invalid = analyze_args();
        invalid.period_ms = Some(-1.0);
        assert!(invalid.validate().is_err());

        let mut invalid = analyze_args();
        invalid.workers = Some(0);
        assert!(invalid.validate().is_err());

        let mut invalid = analyze_args();
        invalid.workers = Some(101);
        assert!(invalid.validate().is_err());

        let mut invalid = analyze_args();
        invalid.pattern = "  ".to_string();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = analyze_args();
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_show_progress() {
        let mut args = analyze_args();
        assert!(args.show_progress());

        args.quiet = true;
        assert!(!args.show_progress());
    }

    #[test]
    fn test_dasm_args_validation() {
        let args = DasmArgs {
            inputs: vec![],
            bin_width_us: -1.0,
            tasks: None,
            output_path: None,
            no_save: false,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
        };
        assert!(args.validate().is_err());
    }
}
