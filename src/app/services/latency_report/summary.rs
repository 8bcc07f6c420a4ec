//! Per-metric summary statistics

use serde::{Deserialize, Serialize};

/// Summary statistics for one derived metric series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Display name of the metric (e.g. "E2E latency")
    pub metric: String,
    /// Number of values in the series
    pub count: usize,
    /// Arithmetic mean, in microseconds
    pub mean_us: f64,
    /// Sample standard deviation (n - 1 denominator), 0.0 for a single value
    pub std_dev_us: f64,
    /// Smallest value, in microseconds
    pub min_us: f64,
    /// Largest value, in microseconds
    pub max_us: f64,
}

impl MetricSummary {
    /// Compute summary statistics for a series
    ///
    /// Returns `None` for an empty series; the caller decides whether that
    /// is an error (it is, for a primary metric of a non-empty analysis).
    pub fn compute(metric: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean_us = values.iter().sum::<f64>() / count as f64;

        let std_dev_us = if count < 2 {
            0.0
        } else {
            let variance = values
                .iter()
                .map(|value| {
                    let delta = value - mean_us;
                    delta * delta
                })
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        };

        let min_us = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max_us = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            metric: metric.into(),
            count,
            mean_us,
            std_dev_us,
            min_us,
            max_us,
        })
    }

    /// One-line rendering used by the human report
    pub fn render_line(&self) -> String {
        format!(
            "mean {:.2} us | std {:.2} us | min {:.2} us | max {:.2} us ({} records)",
            self.mean_us, self.std_dev_us, self.min_us, self.max_us, self.count
        )
    }
}
