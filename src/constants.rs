//! Application constants for chainlat
//!
//! This module contains the required timing field set, log grammar tokens,
//! default values, and naming helpers used throughout the analyzer.

// =============================================================================
// Timing Field Names
// =============================================================================

/// Timing field names emitted by the chain log writers
///
/// The DASM logger converts each chain timestamp to microseconds and writes
/// one `ID = <n>, <field> = <value> us` line per field. The L3 receive
/// timestamp is written under the name `chain_l3_start_us`; the L2 and L1
/// wake timestamps are not written at all.
pub mod fields {
    pub const CHAIN_L3_WAKE_US: &str = "chain_l3_wake_us";
    pub const CHAIN_L3_START_US: &str = "chain_l3_start_us";
    pub const CHAIN_L3_SEND_US: &str = "chain_l3_send_us";
    pub const CHAIN_L2_RECV_US: &str = "chain_l2_recv_us";
    pub const CHAIN_L2_SEND_US: &str = "chain_l2_send_us";
    pub const CHAIN_L1_RECV_US: &str = "chain_l1_recv_us";
    pub const CHAIN_L1_END_US: &str = "chain_l1_end_us";
}

/// The complete field set an episode must collect before it is considered
/// a finished record
///
/// Completion is decided by membership against this set, not by field count,
/// so two different missing/duplicate fields can never cancel out.
pub const REQUIRED_TIMING_FIELDS: &[&str] = &[
    fields::CHAIN_L3_WAKE_US,
    fields::CHAIN_L3_START_US,
    fields::CHAIN_L3_SEND_US,
    fields::CHAIN_L2_RECV_US,
    fields::CHAIN_L2_SEND_US,
    fields::CHAIN_L1_RECV_US,
    fields::CHAIN_L1_END_US,
];

// =============================================================================
// Log Grammar
// =============================================================================

/// Unit suffix terminating a chain timing line
pub const CHAIN_LINE_UNIT: &str = "us";

/// Unit suffix terminating a `[DASM]` end-to-end sample line
pub const DASM_LINE_UNIT: &str = "µs";

/// Task names the DASM process reports, in presentation order
pub const DASM_TASK_ORDER: &[&str] = &["SFM", "Lane", "Detection", "Lidar", "CAN"];

// =============================================================================
// Derived Metric Names
// =============================================================================

/// Display names for the derived metric series
pub mod metrics {
    pub const E2E_LATENCY: &str = "E2E latency";
    pub const EXECUTION_TIME: &str = "Execution time";
    pub const WAITING_TIME: &str = "Waiting time";
}

// =============================================================================
// Analysis Defaults
// =============================================================================

/// Default histogram bin width for chain metrics, in microseconds
pub const DEFAULT_BIN_WIDTH_US: f64 = 10.0;

/// Default histogram bin width for DASM end-to-end samples, in microseconds
pub const DASM_DEFAULT_BIN_WIDTH_US: f64 = 50.0;

/// Default glob pattern when scanning a directory for chain logs
pub const DEFAULT_LOG_PATTERN: &str = "log_*.txt";

/// Default maximum number of parallel file analyses
pub const DEFAULT_PARALLEL_WORKERS: usize = 8;

/// Maximum width of a rendered histogram bar, in terminal cells
pub const HISTOGRAM_BAR_WIDTH: usize = 50;

/// Conversion factor from (record count x period in ms) to minutes
pub const MINUTES_PER_MS: f64 = 1.0 / 60_000.0;

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a field name belongs to the required timing set
pub fn is_required_field(name: &str) -> bool {
    REQUIRED_TIMING_FIELDS.contains(&name)
}

/// Slug used in exported histogram filenames for a metric title
pub fn metric_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// Histogram CSV filename for a log source and metric title
pub fn histogram_csv_filename(source_stem: &str, title: &str) -> String {
    format!("{}_{}_histogram.csv", source_stem, metric_slug(title))
}

/// Estimated capture duration in minutes for a completed-record count and a
/// pipeline period in milliseconds
pub fn capture_minutes(record_count: usize, period_ms: f64) -> f64 {
    record_count as f64 * period_ms * MINUTES_PER_MS
}
