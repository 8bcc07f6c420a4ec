//! Dasm command implementation for the chainlat CLI
//!
//! The `[DASM]` log variant carries pre-computed end-to-end latency samples
//! tagged with a task name, so there is no record reconstruction here: group
//! the samples by task, then summarize and bin each group.

use super::shared::{
    ProcessingStats, read_log_lines, setup_logging, source_stem, write_export,
};
use crate::app::models::DasmSample;
use crate::app::services::chain_log_parser::DasmLineParser;
use crate::app::services::latency_report::{LatencyHistogram, MetricSummary};
use crate::cli::args::{DasmArgs, OutputFormat};
use crate::constants::{DASM_TASK_ORDER, histogram_csv_filename};
use crate::{Error, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-task analysis for one DASM log file
#[derive(Debug)]
struct TaskAnalysis {
    task: String,
    summary: MetricSummary,
    histogram: LatencyHistogram,
}

/// Dasm command runner for chainlat
pub async fn run_dasm(args: DasmArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting DASM sample analysis");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    if let Some(output_path) = &args.output_path
        && !output_path.exists()
    {
        std::fs::create_dir_all(output_path).map_err(|e| {
            Error::configuration(format!(
                "Failed to create output directory '{}': {}",
                output_path.display(),
                e
            ))
        })?;
    }

    let mut stats = ProcessingStats::default();

    for path in &args.inputs {
        match analyze_dasm_file(path, &args) {
            Ok((analyses, lines_scanned, sample_count, exports)) => {
                stats.files_analyzed += 1;
                stats.lines_scanned += lines_scanned;
                stats.records_completed += sample_count;
                stats.export_sizes.extend(exports);
                render_file_report(path, &analyses, &args)?;
            }
            Err(e) => {
                stats.errors_encountered += 1;
                if matches!(e, Error::EmptyAnalysis { .. }) {
                    warn!("{} - no DASM samples found; check the log variant", e);
                } else {
                    return Err(e);
                }
            }
        }
    }

    stats.processing_time = start_time.elapsed();

    if matches!(args.output_format, OutputFormat::Human) {
        println!("🎉 DASM sample analysis complete!");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("   • Files analyzed: {}", stats.files_analyzed);
        println!("   • Samples collected: {}", stats.records_completed);
        if stats.errors_encountered > 0 {
            println!("⚠️  Errors encountered: {}", stats.errors_encountered);
        }
        println!();
    }

    Ok(stats)
}

/// Parse one DASM log and build per-task summaries and histograms
#[allow(clippy::type_complexity)]
fn analyze_dasm_file(
    path: &Path,
    args: &DasmArgs,
) -> Result<(Vec<TaskAnalysis>, usize, usize, Vec<(String, u64)>)> {
    info!("Analyzing DASM log: {}", path.display());

    let parser = DasmLineParser::new();
    let lines = read_log_lines(path)?;
    let lines_scanned = lines.len();

    let samples: Vec<DasmSample> = lines.iter().filter_map(|line| parser.parse(line)).collect();

    let task_filter = args.get_tasks();
    let mut by_task: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sample in &samples {
        if let Some(filter) = &task_filter
            && !filter.contains(&sample.task)
        {
            continue;
        }
        by_task
            .entry(sample.task.clone())
            .or_default()
            .push(sample.latency_us);
    }

    if by_task.is_empty() {
        return Err(Error::empty_analysis(path.display().to_string()));
    }

    let sample_count: usize = by_task.values().map(|values| values.len()).sum();
    let source = source_stem(path);

    let mut analyses = Vec::new();
    for task in ordered_tasks(&by_task) {
        let values = &by_task[&task];
        let title = format!("{} End-to-End latency", task);
        let Some(summary) = MetricSummary::compute(title.clone(), values) else {
            continue;
        };
        let Some(histogram) = LatencyHistogram::build(title, values, args.bin_width_us) else {
            continue;
        };
        analyses.push(TaskAnalysis {
            task,
            summary,
            histogram,
        });
    }

    // Export histogram CSVs unless disabled
    let mut exports = Vec::new();
    if !args.no_save {
        let export_dir = args
            .output_path
            .clone()
            .or_else(|| path.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        for analysis in &analyses {
            let filename = histogram_csv_filename(&source, &analysis.histogram.metric);
            let export_path = export_dir.join(&filename);
            let size = write_export(&export_path, &analysis.histogram.to_csv())?;
            debug!("Exported histogram: {}", export_path.display());
            exports.push((filename, size));
        }
    }

    info!(
        "Collected {} samples across {} task(s) from {}",
        sample_count,
        analyses.len(),
        path.display()
    );

    Ok((analyses, lines_scanned, sample_count, exports))
}

/// Task names in presentation order: the pipeline's canonical tasks first,
/// any others alphabetically after
fn ordered_tasks(by_task: &BTreeMap<String, Vec<f64>>) -> Vec<String> {
    let mut ordered: Vec<String> = DASM_TASK_ORDER
        .iter()
        .copied()
        .filter(|task| by_task.contains_key(*task))
        .map(|task| task.to_string())
        .collect();
    for task in by_task.keys() {
        if !DASM_TASK_ORDER.contains(&task.as_str()) {
            ordered.push(task.clone());
        }
    }
    ordered
}

/// Render the per-file report in the requested format
fn render_file_report(path: &Path, analyses: &[TaskAnalysis], args: &DasmArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("\n📄 {}", source_stem(path).bold());
            for analysis in analyses {
                println!("\n📊 {}", analysis.summary.metric.cyan().bold());
                println!("   {}", analysis.summary.render_line());
                if !args.quiet {
                    print!("{}", analysis.histogram.render());
                }
            }
            println!();
        }
        OutputFormat::Json => {
            let tasks: Vec<serde_json::Value> = analyses
                .iter()
                .map(|analysis| {
                    serde_json::json!({
                        "task": analysis.task,
                        "summary": analysis.summary,
                        "histogram": analysis.histogram,
                    })
                })
                .collect();
            let report = serde_json::json!({
                "source": source_stem(path),
                "tasks": tasks,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
        OutputFormat::Csv => {
            println!("source,task,count,mean_us,std_dev_us,min_us,max_us");
            for analysis in analyses {
                let s = &analysis.summary;
                println!(
                    "{},{},{},{:.4},{:.4},{:.4},{:.4}",
                    source_stem(path),
                    analysis.task,
                    s.count,
                    s.mean_us,
                    s.std_dev_us,
                    s.min_us,
                    s.max_us
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::TaskList;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn write_dasm_log(dir: &Path) -> PathBuf {
        let path = dir.join("dasm_log.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        for id in 0..5 {
            writeln!(
                file,
                "[DASM] SFM ID = {}, End-to-End latency = {:.2} µs",
                id,
                1000.0 + id as f64 * 10.0
            )
            .unwrap();
            writeln!(
                file,
                "[DASM] Lane ID = {}, End-to-End latency = {:.2} µs",
                id,
                500.0 + id as f64 * 5.0
            )
            .unwrap();
        }
        writeln!(file, "[DASM] Sleeping for 33 ms").unwrap();
        path
    }

    fn dasm_args(inputs: Vec<PathBuf>) -> DasmArgs {
        DasmArgs {
            inputs,
            bin_width_us: 50.0,
            tasks: None,
            output_path: None,
            no_save: true,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: true,
        }
    }

    #[test]
    fn test_analyze_dasm_file_groups_by_task() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_dasm_log(temp_dir.path());

        let args = dasm_args(vec![log.clone()]);
        let (analyses, lines_scanned, sample_count, exports) =
            analyze_dasm_file(&log, &args).unwrap();

        assert_eq!(lines_scanned, 11);
        assert_eq!(sample_count, 10);
        assert!(exports.is_empty());
        // SFM comes before Lane per the canonical task order.
        let tasks: Vec<&str> = analyses.iter().map(|a| a.task.as_str()).collect();
        assert_eq!(tasks, vec!["SFM", "Lane"]);
        assert_eq!(analyses[0].summary.count, 5);
    }

    #[test]
    fn test_task_filter_restricts_output() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_dasm_log(temp_dir.path());

        let mut args = dasm_args(vec![log.clone()]);
        args.tasks = Some(TaskList::from_str("Lane").unwrap());

        let (analyses, _, sample_count, _) = analyze_dasm_file(&log, &args).unwrap();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].task, "Lane");
        assert_eq!(sample_count, 5);
    }

    #[test]
    fn test_no_samples_is_distinct_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dasm_log.txt");
        std::fs::write(&path, "[DASM] Started at 1.000 ms\n").unwrap();

        let args = dasm_args(vec![path.clone()]);
        let err = analyze_dasm_file(&path, &args).unwrap_err();
        assert!(matches!(err, Error::EmptyAnalysis { .. }));
    }

    #[test]
    fn test_histogram_export_written() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_dasm_log(temp_dir.path());

        let mut args = dasm_args(vec![log.clone()]);
        args.no_save = false;

        let (_, _, _, exports) = analyze_dasm_file(&log, &args).unwrap();
        assert_eq!(exports.len(), 2);
        assert!(
            temp_dir
                .path()
                .join("dasm_log_sfm_end-to-end_latency_histogram.csv")
                .exists()
        );
    }
}
