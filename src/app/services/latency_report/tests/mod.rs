//! Tests for the statistics and presentation layer
