//! Tests for the chain timing line grammar

use super::SAMPLE_CHAIN_LOG;
use crate::app::services::chain_log_parser::ChainLineParser;

#[test]
fn test_parse_well_formed_line() {
    let parser = ChainLineParser::new();

    let fragment = parser
        .parse("ID = 12, chain_l3_wake_us = 12345.67 us")
        .unwrap();

    assert_eq!(fragment.identifier, 12);
    assert_eq!(fragment.field_name, "chain_l3_wake_us");
    assert_eq!(fragment.field_value, 12345.67);
}

#[test]
fn test_parse_integer_value() {
    let parser = ChainLineParser::new();

    let fragment = parser.parse("ID = 0, chain_l1_end_us = 42 us").unwrap();

    assert_eq!(fragment.identifier, 0);
    assert_eq!(fragment.field_value, 42.0);
}

#[test]
fn test_non_matching_lines_are_skipped() {
    let parser = ChainLineParser::new();

    assert!(parser.parse("").is_none());
    assert!(parser.parse("[DASM] Connected to Planner: 10.0.0.2").is_none());
    assert!(parser.parse("ID = 3").is_none());
    assert!(parser.parse("chain_l3_wake_us = 100.0 us").is_none());
}

#[test]
fn test_missing_unit_suffix_is_skipped() {
    let parser = ChainLineParser::new();

    assert!(parser.parse("ID = 3, chain_l3_wake_us = 100.0").is_none());
    assert!(parser.parse("ID = 3, chain_l3_wake_us = 100.0 ms").is_none());
}

#[test]
fn test_non_numeric_value_is_skipped() {
    let parser = ChainLineParser::new();

    assert!(parser.parse("ID = 3, chain_l3_wake_us = abc us").is_none());
    // The character class admits a doubled decimal point; the float
    // conversion is the gate that rejects it.
    assert!(parser.parse("ID = 3, chain_l3_wake_us = 1.2.3 us").is_none());
}

#[test]
fn test_identifier_overflow_is_skipped() {
    let parser = ChainLineParser::new();

    assert!(
        parser
            .parse("ID = 99999999999999999999, chain_l3_wake_us = 1.0 us")
            .is_none()
    );
}

#[test]
fn test_match_is_found_anywhere_in_line() {
    let parser = ChainLineParser::new();

    let fragment = parser
        .parse("  prefix ID = 7, chain_l2_send_us = 9.50 us trailing")
        .unwrap();

    assert_eq!(fragment.identifier, 7);
    assert_eq!(fragment.field_name, "chain_l2_send_us");
}

#[test]
fn test_sample_log_yields_one_fragment_per_timing_line() {
    let parser = ChainLineParser::new();

    let fragments: Vec<_> = SAMPLE_CHAIN_LOG
        .lines()
        .filter_map(|line| parser.parse(line))
        .collect();

    assert_eq!(fragments.len(), 7);
    assert!(fragments.iter().all(|f| f.identifier == 3));
}
