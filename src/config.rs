//! Configuration management and validation
//!
//! Configuration is layered: built-in defaults, then `CHAINLAT_*`
//! environment variables, then explicit CLI arguments, each overriding the
//! last. There is no configuration file format; the analyzer's surface is
//! small enough that environment plus flags covers it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::constants::{DEFAULT_BIN_WIDTH_US, DEFAULT_LOG_PATTERN, DEFAULT_PARALLEL_WORKERS};
use crate::{Error, Result};

/// Analysis parameter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Histogram bin width in microseconds
    pub bin_width_us: f64,

    /// Pipeline period in milliseconds, for the capture-duration estimate
    pub period_ms: Option<f64>,

    /// Glob pattern used when scanning a directory for chain logs
    pub file_pattern: String,

    /// Destination directory for exported histogram CSVs; `None` writes next
    /// to each analyzed log
    pub output_path: Option<PathBuf>,

    /// Skip writing histogram CSV files entirely
    pub no_save: bool,
}

/// Performance tuning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Maximum number of log files analyzed concurrently
    pub parallel_workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level name (error, warn, info, debug, trace)
    pub level: String,
}

/// Global configuration for a chainlat run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig {
                bin_width_us: DEFAULT_BIN_WIDTH_US,
                period_ms: None,
                file_pattern: DEFAULT_LOG_PATTERN.to_string(),
                output_path: None,
                no_save: false,
            },
            performance: PerformanceConfig {
                parallel_workers: num_cpus::get().min(DEFAULT_PARALLEL_WORKERS),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl Config {
    /// Load defaults with environment-variable overrides applied
    ///
    /// Recognized variables: `CHAINLAT_BIN_WIDTH_US`, `CHAINLAT_WORKERS`,
    /// `CHAINLAT_LOG_PATTERN`. Unparseable values are rejected rather than
    /// silently ignored.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("CHAINLAT_BIN_WIDTH_US") {
            config.analysis.bin_width_us = raw.parse::<f64>().map_err(|_| {
                Error::configuration(format!("Invalid CHAINLAT_BIN_WIDTH_US value: '{}'", raw))
            })?;
        }

        if let Ok(raw) = std::env::var("CHAINLAT_WORKERS") {
            config.performance.parallel_workers = raw.parse::<usize>().map_err(|_| {
                Error::configuration(format!("Invalid CHAINLAT_WORKERS value: '{}'", raw))
            })?;
        }

        if let Ok(pattern) = std::env::var("CHAINLAT_LOG_PATTERN") {
            config.analysis.file_pattern = pattern;
        }

        debug!("Loaded configuration: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.analysis.bin_width_us <= 0.0 {
            return Err(Error::configuration(
                "Histogram bin width must be positive".to_string(),
            ));
        }

        if let Some(period) = self.analysis.period_ms
            && period <= 0.0
        {
            return Err(Error::configuration(
                "Pipeline period must be positive".to_string(),
            ));
        }

        if self.performance.parallel_workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.performance.parallel_workers > 100 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 100".to_string(),
            ));
        }

        if self.analysis.file_pattern.trim().is_empty() {
            return Err(Error::configuration(
                "Log file pattern cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Create configuration with a custom bin width
    pub fn with_bin_width(mut self, bin_width_us: f64) -> Self {
        self.analysis.bin_width_us = bin_width_us;
        self
    }

    /// Create configuration with a custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.parallel_workers = workers;
        self
    }

    /// Create configuration with a pipeline period for duration estimates
    pub fn with_period_ms(mut self, period_ms: f64) -> Self {
        self.analysis.period_ms = Some(period_ms);
        self
    }

    /// Ensure the output directory exists, creating it if needed
    pub fn ensure_output_directory(&self) -> Result<()> {
        if let Some(output_path) = &self.analysis.output_path
            && !output_path.exists()
        {
            std::fs::create_dir_all(output_path).map_err(|e| {
                Error::configuration(format!(
                    "Failed to create output directory '{}': {}",
                    output_path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
