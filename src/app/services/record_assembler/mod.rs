//! Record assembly engine for chain timing logs
//!
//! This is the stateful heart of the analyzer: an unordered, interleaved
//! stream of parsed fragments goes in, completed per-identifier records with
//! derived metrics come out, and whatever never finished is reported at end
//! of stream instead of being dropped.
//!
//! ## Architecture
//!
//! The engine is organized into logical components:
//! - [`assembler`] - per-identifier accumulation, completion detection,
//!   and end-of-stream finalization
//! - [`metrics`] - derived timing metric computation for completed field sets
//! - [`stats`] - assembly statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use chainlat::app::services::record_assembler::assemble_lines;
//!
//! let log = "ID = 1, chain_l3_wake_us = 5.0 us";
//! let result = assemble_lines(log.lines());
//!
//! println!(
//!     "{} completed, {} stranded",
//!     result.completed.len(),
//!     result.stranded.len()
//! );
//! ```

pub mod assembler;
pub mod metrics;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use assembler::{RecordAssembler, assemble_lines};
pub use metrics::compute_metrics;
pub use stats::{AssemblyResult, AssemblyStats};
