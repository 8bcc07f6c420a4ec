//! Line parsers for the task-chain log formats
//!
//! Two line grammars exist in the wild:
//! - [`line`] - the primary chain timing format,
//!   `ID = <int>, <field> = <float> us`, one timing field per line
//! - [`dasm`] - the secondary `[DASM]` format carrying a single
//!   pre-computed end-to-end latency sample per line
//!
//! Both parsers are skip-based: a line that does not match its grammar
//! yields no value and no error. Chain logs are full of non-matching
//! content (blank separators between episodes, scheduler diagnostics) and
//! ignoring it silently is the contract.

pub mod dasm;
pub mod line;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use dasm::DasmLineParser;
pub use line::ChainLineParser;
