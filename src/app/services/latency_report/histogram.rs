//! Fixed-width histogram binning and rendering
//!
//! Bin edges run from `trunc(min) - w` up past `max` in steps of the caller's
//! bin width `w`, so the occupied range is always padded by one empty bin on
//! each side. Bins are half-open `[lower, upper)` except the last, which is
//! closed so the maximum value always lands in a bin.

use serde::{Deserialize, Serialize};

use crate::constants::HISTOGRAM_BAR_WIDTH;

/// One histogram bin with its value range and occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge, in microseconds
    pub lower_us: f64,
    /// Exclusive upper edge (inclusive for the final bin), in microseconds
    pub upper_us: f64,
    /// Number of values in the bin
    pub count: usize,
}

/// A binned metric series ready for rendering or export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyHistogram {
    /// Display name of the binned metric
    pub metric: String,
    /// Bin width in microseconds
    pub bin_width_us: f64,
    /// Bins in ascending range order
    pub bins: Vec<HistogramBin>,
}

impl LatencyHistogram {
    /// Bin a series with the given width
    ///
    /// Returns `None` for an empty series. The width must be positive;
    /// argument validation enforces that before any series reaches here.
    pub fn build(metric: impl Into<String>, values: &[f64], bin_width_us: f64) -> Option<Self> {
        if values.is_empty() || bin_width_us <= 0.0 {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let start = min.trunc() - bin_width_us;
        let stop = max.trunc() + bin_width_us;

        let bin_count = (((stop - start) / bin_width_us).ceil() as usize).max(1);
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower_us: start + i as f64 * bin_width_us,
                upper_us: start + (i + 1) as f64 * bin_width_us,
                count: 0,
            })
            .collect();

        for value in values {
            let offset = ((value - start) / bin_width_us).floor();
            let index = if offset < 0.0 {
                0
            } else {
                (offset as usize).min(bin_count - 1)
            };
            bins[index].count += 1;
        }

        Some(Self {
            metric: metric.into(),
            bin_width_us,
            bins,
        })
    }

    /// Total number of values binned
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Render the histogram as terminal text, one bin per line
    ///
    /// Bars are scaled so the fullest bin spans the configured maximum
    /// width; empty leading and trailing bins are kept because they frame
    /// the occupied range.
    pub fn render(&self) -> String {
        let peak = self.bins.iter().map(|bin| bin.count).max().unwrap_or(0);
        if peak == 0 {
            return String::new();
        }

        let mut out = String::new();
        for bin in &self.bins {
            let bar_len = (bin.count * HISTOGRAM_BAR_WIDTH).div_ceil(peak.max(1));
            let bar_len = if bin.count > 0 { bar_len.max(1) } else { 0 };
            out.push_str(&format!(
                "{:>12.1} .. {:<12.1} | {:<width$} {}\n",
                bin.lower_us,
                bin.upper_us,
                "#".repeat(bar_len),
                bin.count,
                width = HISTOGRAM_BAR_WIDTH
            ));
        }
        out
    }

    /// Serialize the bins as CSV for downstream plotting
    pub fn to_csv(&self) -> String {
        let mut out = String::from("bin_lower_us,bin_upper_us,count\n");
        for bin in &self.bins {
            out.push_str(&format!(
                "{},{},{}\n",
                bin.lower_us, bin.upper_us, bin.count
            ));
        }
        out
    }
}
