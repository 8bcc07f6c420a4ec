//! Per-source analysis report
//!
//! A [`LatencyReport`] is the bridge between the assembly engine and the
//! output layer: it extracts the three derived metric series from the
//! completed records, computes their summaries, and carries the assembly
//! counters and stranded-record diagnostics alongside.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::summary::MetricSummary;
use crate::app::models::StrandedRecord;
use crate::app::services::record_assembler::{AssemblyResult, AssemblyStats};
use crate::constants::{capture_minutes, metrics};
use crate::{Error, Result};

/// A named series of metric values extracted from completed records
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    /// Display name of the metric
    pub title: String,
    /// Values in record-completion order, in microseconds
    pub values: Vec<f64>,
}

/// Full analysis report for one log source
#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    /// Name of the analyzed source (log file stem)
    pub source: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Assembly counters for the underlying line stream
    pub stats: AssemblyStats,
    /// Summary statistics, one entry per derived metric
    pub summaries: Vec<MetricSummary>,
    /// Identifiers stranded with incomplete records
    pub stranded: Vec<StrandedRecord>,
    /// Estimated capture duration in minutes, when the pipeline period is
    /// known
    pub capture_minutes: Option<f64>,
    /// The raw metric series, kept for histogram generation
    #[serde(skip)]
    pub series: Vec<MetricSeries>,
}

impl LatencyReport {
    /// Build a report from an assembly result
    ///
    /// Fails with [`Error::EmptyAnalysis`] when the result holds no completed
    /// records, so a format mismatch surfaces as a distinct signal rather
    /// than an all-zero report.
    pub fn from_assembly(
        source: impl Into<String>,
        result: &AssemblyResult,
        period_ms: Option<f64>,
    ) -> Result<Self> {
        let source = source.into();
        if !result.has_records() {
            return Err(Error::empty_analysis(source));
        }

        let series = vec![
            MetricSeries {
                title: metrics::E2E_LATENCY.to_string(),
                values: result
                    .completed
                    .iter()
                    .map(|r| r.metrics.e2e_latency_us)
                    .collect(),
            },
            MetricSeries {
                title: metrics::EXECUTION_TIME.to_string(),
                values: result
                    .completed
                    .iter()
                    .map(|r| r.metrics.execution_time_us)
                    .collect(),
            },
            MetricSeries {
                title: metrics::WAITING_TIME.to_string(),
                values: result
                    .completed
                    .iter()
                    .map(|r| r.metrics.waiting_time_us)
                    .collect(),
            },
        ];

        let summaries = series
            .iter()
            .filter_map(|s| MetricSummary::compute(s.title.clone(), &s.values))
            .collect();

        Ok(Self {
            source,
            generated_at: Utc::now(),
            stats: result.stats.clone(),
            summaries,
            stranded: result.stranded.clone(),
            capture_minutes: period_ms
                .map(|period| capture_minutes(result.completed.len(), period)),
            series,
        })
    }

    /// Number of completed records behind the report
    pub fn record_count(&self) -> usize {
        self.stats.records_completed
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::report_writing(
                format!("Failed to serialize report for '{}'", self.source),
                std::io::Error::other(e),
            )
        })
    }

    /// Render the report as CSV rows, one line per metric summary
    pub fn render_csv(&self) -> String {
        let mut out = String::from("source,metric,count,mean_us,std_dev_us,min_us,max_us\n");
        for summary in &self.summaries {
            out.push_str(&format!(
                "{},{},{},{:.4},{:.4},{:.4},{:.4}\n",
                self.source,
                summary.metric,
                summary.count,
                summary.mean_us,
                summary.std_dev_us,
                summary.min_us,
                summary.max_us
            ));
        }
        out
    }
}
