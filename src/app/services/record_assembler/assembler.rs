//! Per-identifier record assembly
//!
//! The assembler owns the only mutable state in the pipeline: the mapping
//! from identifier to its in-progress record. Fragments arrive in stream
//! order; each one either opens an episode, extends one, or completes one.
//! Identifiers recycle - the log writers use a small cycling counter - so a
//! completed identifier is immediately free to open a fresh, unrelated
//! episode.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use super::metrics::compute_metrics;
use super::stats::{AssemblyResult, AssemblyStats};
use crate::app::models::{CompletedRecord, LogFragment, PendingRecord, StrandedRecord};
use crate::app::services::chain_log_parser::ChainLineParser;

/// Stateful assembler turning a fragment stream into completed records
///
/// Invariant: at most one pending record per identifier. Completion removes
/// the pending record atomically with the emission of its completed
/// counterpart, so `episodes opened == completed + still open` holds at every
/// step. One assembler instance owns its entire open set; independent
/// instances never interfere.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    open: HashMap<u32, PendingRecord>,
    stats: AssemblyStats,
}

impl RecordAssembler {
    /// Create an assembler with no open episodes
    pub fn new() -> Self {
        Self {
            open: HashMap::new(),
            stats: AssemblyStats::new(),
        }
    }

    /// Merge one parsed fragment, returning the completed record if this
    /// fragment finished its episode
    ///
    /// Accumulation never fails: an unknown field name is stored (it may
    /// matter for diagnostics) but only required fields count toward
    /// completion, and a repeated field name within an open episode
    /// overwrites the earlier value.
    pub fn ingest(&mut self, fragment: LogFragment) -> Option<CompletedRecord> {
        self.stats.fragments_merged += 1;
        let identifier = fragment.identifier;

        let pending = match self.open.entry(identifier) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.stats.episodes_opened += 1;
                entry.insert(PendingRecord::new(identifier))
            }
        };
        pending.merge(&fragment);

        if !pending.is_complete() {
            return None;
        }

        // Remove-and-emit is one step; the identifier is free for a new
        // episode as soon as the completed record exists.
        let finished = self.open.remove(&identifier)?;
        let metrics = compute_metrics(&finished.fields)?;
        self.stats.records_completed += 1;

        Some(CompletedRecord {
            identifier,
            metrics,
            fields: finished.fields,
        })
    }

    /// Number of identifiers with an open episode
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> &AssemblyStats {
        &self.stats
    }

    /// Consume the assembler at end of stream, reporting every episode that
    /// never completed
    ///
    /// Stranded episodes are diagnostics, not failures: the records completed
    /// before this call remain valid output. Results are sorted by identifier
    /// for stable reporting.
    pub fn finalize(mut self) -> (Vec<StrandedRecord>, AssemblyStats) {
        let mut stranded: Vec<StrandedRecord> = self
            .open
            .drain()
            .map(|(_, pending)| StrandedRecord::from_pending(pending))
            .collect();
        stranded.sort_by_key(|record| record.identifier);

        self.stats.records_stranded = stranded.len();
        (stranded, self.stats)
    }
}

/// Run the full assembly pipeline over a sequence of raw log lines
///
/// This is the single entry point the commands use: parse each line, feed
/// the fragments through one assembler, and finalize. Lines that match no
/// grammar are counted and skipped.
pub fn assemble_lines<I, S>(lines: I) -> AssemblyResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parser = ChainLineParser::new();
    let mut assembler = RecordAssembler::new();
    let mut completed = Vec::new();

    let mut lines_scanned = 0;
    let mut lines_skipped = 0;

    for line in lines {
        lines_scanned += 1;
        match parser.parse(line.as_ref()) {
            Some(fragment) => {
                if let Some(record) = assembler.ingest(fragment) {
                    completed.push(record);
                }
            }
            None => lines_skipped += 1,
        }
    }

    let (stranded, mut stats) = assembler.finalize();
    stats.lines_scanned = lines_scanned;
    stats.lines_skipped = lines_skipped;

    debug!("{}", stats.summary());
    if !stranded.is_empty() {
        warn!(
            "{} identifier(s) left incomplete at end of stream: {:?}",
            stranded.len(),
            stranded.iter().map(|r| r.identifier).collect::<Vec<_>>()
        );
    }

    AssemblyResult {
        completed,
        stranded,
        stats,
    }
}
