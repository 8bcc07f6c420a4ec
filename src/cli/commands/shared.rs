//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! the analyze and dasm command implementations.

use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Processing statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of log files analyzed
    pub files_analyzed: usize,
    /// Number of completed records (or samples, for the dasm command)
    pub records_completed: usize,
    /// Number of identifiers stranded with incomplete records
    pub records_stranded: usize,
    /// Total lines scanned across all files
    pub lines_scanned: usize,
    /// Number of per-file errors encountered
    pub errors_encountered: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
    /// Exported file sizes in bytes
    pub export_sizes: Vec<(String, u64)>,
}

impl ProcessingStats {
    /// Calculate total exported size in bytes
    pub fn total_export_size(&self) -> u64 {
        self.export_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Format a byte size in human-readable form
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chainlat={}", log_level)));

    // Set up subscriber based on output preference
    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Resolve CLI inputs (files, directories, glob patterns) into log file paths
///
/// Directories are scanned non-recursively at first level and recursively
/// below, keeping files whose name matches `pattern`. The result is sorted
/// and deduplicated for a stable processing order.
pub fn resolve_inputs(inputs: &[String], pattern: &str) -> Result<Vec<PathBuf>> {
    let name_pattern = glob::Pattern::new(pattern)
        .map_err(|e| Error::configuration(format!("Invalid scan pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();

    for input in inputs {
        if input.contains(['*', '?', '[']) {
            // Shell-style pattern: expand in place
            let matches = glob::glob(input).map_err(|e| {
                Error::configuration(format!("Invalid glob pattern '{}': {}", input, e))
            })?;
            for entry in matches.flatten() {
                if entry.is_file() {
                    files.push(entry);
                }
            }
            continue;
        }

        let path = PathBuf::from(input);
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(&path).follow_links(false) {
                let entry = entry?;
                let entry_path = entry.path();
                let matches_name = entry_path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name_pattern.matches(name));
                if entry_path.is_file() && matches_name {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(Error::file_not_found(input.clone()));
        }
    }

    files.sort();
    files.dedup();

    debug!("Resolved {} log file(s) from {} input(s)", files.len(), inputs.len());
    for file in &files {
        debug!("  Found: {}", file.display());
    }

    Ok(files)
}

/// Read a log file into lines
pub fn read_log_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read log file {}", path.display()), e))?;
    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// The filename stem used to label a log source in reports and exports
pub fn source_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("log")
        .to_string()
}

/// Write a text export, returning its size in bytes
pub fn write_export(path: &Path, content: &str) -> Result<u64> {
    std::fs::write(path, content)
        .map_err(|e| Error::report_writing(format!("Failed to write {}", path.display()), e))?;
    Ok(content.len() as u64)
}

/// Check if an error is critical enough to stop processing
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. } | Error::ProcessingInterrupted { .. }
    )
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
