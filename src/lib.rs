//! Chainlat Library
//!
//! A Rust library for reconstructing per-identifier latency records from the
//! interleaved log files written by a bare-metal task-chain pipeline and
//! turning them into latency statistics and histograms.
//!
//! This library provides tools for:
//! - Parsing chain timing log lines and `[DASM]` end-to-end samples
//! - Accumulating partial key/value fragments into complete records per
//!   identifier, with identifier recycling between episodes
//! - Computing derived timing metrics (E2E latency, execution time,
//!   waiting time) on record completion
//! - Reporting identifiers stranded with incomplete records at end of stream
//! - Summarizing metric series and rendering fixed-width histograms

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod chain_log_parser;
        pub mod latency_report;
        pub mod record_assembler;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CompletedRecord, DasmSample, LogFragment, StrandedRecord};
pub use config::Config;

/// Result type alias for chainlat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for latency log analysis operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Log format error
    #[error("Log format error in file '{file}': {message}")]
    LogFormat { file: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// No completed records in an analysis (format mismatch or empty input)
    #[error("No completed latency records found in '{source_name}'")]
    EmptyAnalysis { source_name: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Report or histogram export failed
    #[error("Report writing error: {message}")]
    ReportWriting {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a log format error
    pub fn log_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LogFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create an empty-analysis error for a named source
    pub fn empty_analysis(source_name: impl Into<String>) -> Self {
        Self::EmptyAnalysis {
            source_name: source_name.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a report writing error
    pub fn report_writing(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReportWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
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

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
