//! Domain models for chain latency analysis
//!
//! The types here follow the life of a log line: a parsed [`LogFragment`]
//! is merged into the [`PendingRecord`] open for its identifier, which either
//! becomes a [`CompletedRecord`] once every required timing field has arrived
//! or is reported as a [`StrandedRecord`] at end of stream. `[DASM]` sample
//! lines bypass accumulation entirely and parse straight into a
//! [`DasmSample`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::REQUIRED_TIMING_FIELDS;

/// One parsed key/value fragment from a chain timing log line
///
/// Transient: produced by the line parser and immediately consumed by the
/// record assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFragment {
    /// Cycling episode identifier the fragment belongs to
    pub identifier: u32,
    /// Timing field name (e.g. `chain_l1_end_us`)
    pub field_name: String,
    /// Timestamp value in microseconds
    pub field_value: f64,
}

impl LogFragment {
    pub fn new(identifier: u32, field_name: impl Into<String>, field_value: f64) -> Self {
        Self {
            identifier,
            field_name: field_name.into(),
            field_value,
        }
    }
}

/// The in-progress record for one open identifier episode
///
/// At most one pending record exists per identifier at any time; completion
/// removes it from the open set and frees the identifier for a later,
/// unrelated episode.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    /// Identifier of the open episode
    pub identifier: u32,
    /// Field name to microsecond value, last write wins
    pub fields: HashMap<String, f64>,
}

impl PendingRecord {
    /// Create an empty pending record for an identifier
    pub fn new(identifier: u32) -> Self {
        Self {
            identifier,
            fields: HashMap::new(),
        }
    }

    /// Merge a fragment's field into this record, overwriting any earlier
    /// value for the same field name within this episode
    pub fn merge(&mut self, fragment: &LogFragment) {
        self.fields
            .insert(fragment.field_name.clone(), fragment.field_value);
    }

    /// Number of required timing fields collected so far
    pub fn required_fields_held(&self) -> usize {
        REQUIRED_TIMING_FIELDS
            .iter()
            .filter(|name| self.fields.contains_key(**name))
            .count()
    }

    /// Whether every required timing field has been collected
    pub fn is_complete(&self) -> bool {
        REQUIRED_TIMING_FIELDS
            .iter()
            .all(|name| self.fields.contains_key(*name))
    }

    /// Required field names this record is still missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_TIMING_FIELDS
            .iter()
            .copied()
            .filter(|name| !self.fields.contains_key(*name))
            .collect()
    }
}

/// Derived timing metrics for one completed episode
///
/// Values are carried exactly as computed; clock skew or malformed logs can
/// legitimately produce negative values and downstream consumers are the
/// ones that flag them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// `chain_l1_end_us - chain_l3_wake_us`
    pub e2e_latency_us: f64,
    /// Sum of the per-level (send - receive) spans
    pub execution_time_us: f64,
    /// `e2e_latency_us - execution_time_us`
    pub waiting_time_us: f64,
}

/// An episode whose full timing field set arrived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRecord {
    /// Identifier the episode ran under (may recur in later episodes)
    pub identifier: u32,
    /// Derived timing metrics
    pub metrics: DerivedMetrics,
    /// Raw field mapping, kept for diagnostics
    pub fields: HashMap<String, f64>,
}

/// An identifier whose record never completed before end of stream
///
/// Informational: stranded records never contribute to metric series, but
/// the run that produced them is still considered successful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandedRecord {
    /// Identifier left open at end of stream
    pub identifier: u32,
    /// Partial field mapping collected before the stream ended
    pub fields: HashMap<String, f64>,
    /// Required field names that never arrived
    pub missing_fields: Vec<String>,
}

impl StrandedRecord {
    /// Build the diagnostic from a pending record abandoned at end of stream
    pub fn from_pending(pending: PendingRecord) -> Self {
        let missing_fields = pending
            .missing_fields()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        Self {
            identifier: pending.identifier,
            fields: pending.fields,
            missing_fields,
        }
    }

    /// Number of required fields the record held when the stream ended
    pub fn required_fields_held(&self) -> usize {
        REQUIRED_TIMING_FIELDS.len() - self.missing_fields.len()
    }
}

/// One `[DASM] <task> ID = <n>, End-to-End latency = <v> µs` sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DasmSample {
    /// Reporting task name (SFM, Lane, Detection, ...)
    pub task: String,
    /// Episode identifier the sample was measured for
    pub identifier: u32,
    /// End-to-end latency in microseconds
    pub latency_us: f64,
}
