//! Derived timing metric computation
//!
//! Formulas, with all values in microseconds:
//!
//! ```text
//! e2e_latency    = chain_l1_end_us - chain_l3_wake_us
//! execution_time = (chain_l3_send_us - chain_l3_start_us)
//!                + (chain_l2_send_us - chain_l2_recv_us)
//!                + (chain_l1_end_us  - chain_l1_recv_us)
//! waiting_time   = e2e_latency - execution_time
//! ```
//!
//! No bounds checking beyond field presence: clock skew between chain hosts
//! can make any of these negative and the values are passed through as
//! computed for downstream consumers to judge.

use std::collections::HashMap;

use crate::app::models::DerivedMetrics;
use crate::constants::fields;

/// Compute the derived metrics for a completed field set
///
/// Returns `None` when a required field is absent, which the assembler's
/// completion check rules out before calling.
pub fn compute_metrics(field_map: &HashMap<String, f64>) -> Option<DerivedMetrics> {
    let field = |name: &str| field_map.get(name).copied();

    let l3_wake = field(fields::CHAIN_L3_WAKE_US)?;
    let l3_start = field(fields::CHAIN_L3_START_US)?;
    let l3_send = field(fields::CHAIN_L3_SEND_US)?;
    let l2_recv = field(fields::CHAIN_L2_RECV_US)?;
    let l2_send = field(fields::CHAIN_L2_SEND_US)?;
    let l1_recv = field(fields::CHAIN_L1_RECV_US)?;
    let l1_end = field(fields::CHAIN_L1_END_US)?;

    let e2e_latency_us = l1_end - l3_wake;
    let execution_time_us = (l3_send - l3_start) + (l2_send - l2_recv) + (l1_end - l1_recv);
    let waiting_time_us = e2e_latency_us - execution_time_us;

    Some(DerivedMetrics {
        e2e_latency_us,
        execution_time_us,
        waiting_time_us,
    })
}
