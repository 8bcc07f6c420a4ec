//! Assembly statistics and result structures
//!
//! This module provides types for tracking how a line stream decomposed into
//! fragments, completed records, and stranded episodes, and for carrying the
//! assembled output to the reporting layer.

use crate::app::models::{CompletedRecord, StrandedRecord};

/// Assembly result with completed records, stranded diagnostics, and
/// statistics
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    /// Records whose full timing field set arrived, in completion order
    pub completed: Vec<CompletedRecord>,

    /// Identifiers still open when the stream ended, with their partial
    /// field sets
    pub stranded: Vec<StrandedRecord>,

    /// Counters describing the run
    pub stats: AssemblyStats,
}

impl AssemblyResult {
    /// Whether the stream yielded at least one completed record
    ///
    /// An all-false result usually means a log-format mismatch rather than a
    /// quiet capture; callers use this to skip statistics instead of
    /// summarizing an empty series.
    pub fn has_records(&self) -> bool {
        !self.completed.is_empty()
    }

    /// Whether the stream produced nothing at all, completed or stranded
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.stranded.is_empty()
    }
}

/// Counters for one pass over a line stream
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssemblyStats {
    /// Total number of lines inspected
    pub lines_scanned: usize,

    /// Lines that parsed into a timing fragment
    pub fragments_merged: usize,

    /// Lines that matched no grammar and were skipped
    pub lines_skipped: usize,

    /// Distinct identifier episodes opened (an identifier reused after
    /// completion counts again)
    pub episodes_opened: usize,

    /// Episodes that collected their full field set
    pub records_completed: usize,

    /// Episodes still open at end of stream
    pub records_stranded: usize,
}

impl AssemblyStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            lines_scanned: 0,
            fragments_merged: 0,
            lines_skipped: 0,
            episodes_opened: 0,
            records_completed: 0,
            records_stranded: 0,
        }
    }

    /// Fraction of opened episodes that completed, as a percentage
    pub fn completion_rate(&self) -> f64 {
        if self.episodes_opened == 0 {
            0.0
        } else {
            (self.records_completed as f64 / self.episodes_opened as f64) * 100.0
        }
    }

    /// Check whether assembly was mostly clean (>90% of episodes completed)
    pub fn is_successful(&self) -> bool {
        self.completion_rate() > 90.0
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Assembly summary: {} lines -> {} fragments | \
             {} episodes, {} completed, {} stranded ({:.1}% complete)",
            self.lines_scanned,
            self.fragments_merged,
            self.episodes_opened,
            self.records_completed,
            self.records_stranded,
            self.completion_rate()
        )
    }
}

impl Default for AssemblyStats {
    fn default() -> Self {
        Self::new()
    }
}
