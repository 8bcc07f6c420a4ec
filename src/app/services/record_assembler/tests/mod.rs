//! Test utilities for the record assembly engine

use crate::app::models::LogFragment;
use crate::constants::REQUIRED_TIMING_FIELDS;

// Test modules
mod assembler_tests;

/// Build the full fragment set for one episode, with every timestamp offset
/// by `base` so different episodes get distinct values.
pub fn full_episode(identifier: u32, base: f64) -> Vec<LogFragment> {
    REQUIRED_TIMING_FIELDS
        .iter()
        .enumerate()
        .map(|(i, name)| LogFragment::new(identifier, *name, base + i as f64 * 10.0))
        .collect()
}

/// Render fragments as raw log lines in the writers' format.
pub fn to_log_lines(fragments: &[LogFragment]) -> Vec<String> {
    fragments
        .iter()
        .map(|f| {
            format!(
                "ID = {}, {} = {:.2} us",
                f.identifier, f.field_name, f.field_value
            )
        })
        .collect()
}
