//! `[DASM]` end-to-end sample line parser
//!
//! Accepted language, anchored at the start of the trimmed line:
//!
//! ```text
//! [DASM] <task_name:\w+> ID = <identifier:[0-9]+>, End-to-End latency = <value:[0-9.]+> µs
//! ```
//!
//! Unlike the chain timing format these lines carry a finished measurement,
//! so no accumulation happens downstream; each matching line is one sample.

use regex::Regex;

use crate::app::models::DasmSample;

/// Parser for `[DASM] <task> ID = <n>, End-to-End latency = <v> µs` lines
#[derive(Debug)]
pub struct DasmLineParser {
    pattern: Regex,
}

impl DasmLineParser {
    /// Create a parser with the DASM sample grammar compiled
    pub fn new() -> Self {
        let pattern = Regex::new(r"^\[DASM\] (\w+) ID = (\d+), End-to-End latency = ([\d.]+) µs")
            .expect("DASM line pattern must compile");
        Self { pattern }
    }

    /// Extract the (task, identifier, latency) triple from one line
    ///
    /// The line is trimmed before matching; anything that is not a DASM
    /// latency sample (connection banners, wake-up traces) is skipped.
    pub fn parse(&self, line: &str) -> Option<DasmSample> {
        let captures = self.pattern.captures(line.trim())?;

        let task = captures.get(1)?.as_str().to_string();
        let identifier = captures.get(2)?.as_str().parse::<u32>().ok()?;
        let latency_us = captures.get(3)?.as_str().parse::<f64>().ok()?;

        Some(DasmSample {
            task,
            identifier,
            latency_us,
        })
    }
}

impl Default for DasmLineParser {
    fn default() -> Self {
        Self::new()
    }
}
