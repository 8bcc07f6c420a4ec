//! Test fixtures for the chain log line parsers

mod line_tests;

/// A realistic chain log excerpt: one complete episode, a blank separator,
/// and assorted non-matching diagnostics.
pub const SAMPLE_CHAIN_LOG: &str = "\
[DASM] Waiting for connection on port 9000...
ID = 3, chain_l3_wake_us = 1000.25 us
ID = 3, chain_l3_start_us = 1010.50 us
ID = 3, chain_l3_send_us = 1200.00 us
ID = 3, chain_l2_recv_us = 1210.75 us
ID = 3, chain_l2_send_us = 1400.00 us
ID = 3, chain_l1_recv_us = 1410.00 us
ID = 3, chain_l1_end_us = 1600.00 us

[DASM] wake-up at 1700.000 ms
";
