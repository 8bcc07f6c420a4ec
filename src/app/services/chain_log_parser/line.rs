//! Chain timing line parser
//!
//! Accepted language, matched anywhere within a line:
//!
//! ```text
//! ID = <identifier:[0-9]+>, <field_name:\w+> = <value:[0-9.]+> us
//! ```
//!
//! The identifier is a decimal integer, the field name is a word token, and
//! the value is a decimal float followed by the fixed `us` unit suffix. The
//! log writers emit nothing else on matching lines, but matching by search
//! rather than by full-line anchor keeps the parser robust to incidental
//! prefixes.

use regex::Regex;

use crate::app::models::LogFragment;

/// Parser for `ID = <n>, <field> = <value> us` timing lines
///
/// Compile once, use for every line of a stream. Parsing has no side
/// effects; a non-matching line is a skip, not an error.
#[derive(Debug)]
pub struct ChainLineParser {
    pattern: Regex,
}

impl ChainLineParser {
    /// Create a parser with the chain timing grammar compiled
    pub fn new() -> Self {
        // The pattern is a fixed literal, so compilation cannot fail.
        let pattern = Regex::new(r"ID = (\d+), (\w+) = ([\d.]+) us")
            .expect("chain line pattern must compile");
        Self { pattern }
    }

    /// Extract the (identifier, field name, value) triple from one line
    ///
    /// Returns `None` for headers, blank lines, unrelated diagnostics, and
    /// lines whose captured number text does not convert cleanly (e.g. a
    /// doubled decimal point) - all of these are expected in real logs and
    /// skipped without error.
    pub fn parse(&self, line: &str) -> Option<LogFragment> {
        let captures = self.pattern.captures(line)?;

        let identifier = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let field_name = captures.get(2)?.as_str().to_string();
        let field_value = captures.get(3)?.as_str().parse::<f64>().ok()?;

        Some(LogFragment {
            identifier,
            field_name,
            field_value,
        })
    }
}

impl Default for ChainLineParser {
    fn default() -> Self {
        Self::new()
    }
}
