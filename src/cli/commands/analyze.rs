//! Analyze command implementation for the chainlat CLI
//!
//! This module contains the complete chain-log analysis workflow:
//! configuration loading, log file resolution, concurrent per-file
//! reconstruction, and report generation.

use super::shared::{
    ProcessingStats, create_progress_bar, is_critical_error, read_log_lines, resolve_inputs,
    setup_logging, source_stem, write_export,
};
use crate::app::services::latency_report::{LatencyHistogram, LatencyReport};
use crate::app::services::record_assembler::assemble_lines;
use crate::cli::args::{AnalyzeArgs, OutputFormat};
use crate::config::Config;
use crate::constants::histogram_csv_filename;
use crate::{Error, Result};
use colored::Colorize;
use futures::StreamExt;
use indicatif::HumanDuration;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Analysis output for one log file
#[derive(Debug)]
struct FileAnalysis {
    report: LatencyReport,
    histograms: Vec<LatencyHistogram>,
    exports: Vec<(String, u64)>,
}

/// Analyze command runner for chainlat
///
/// This function orchestrates the entire analysis workflow:
/// 1. Set up logging and configuration
/// 2. Resolve inputs into log files
/// 3. Reconstruct records per file, concurrently
/// 4. Render reports and export histograms
pub async fn run_analyze(args: AnalyzeArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    // Set up logging
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting chainlat analyzer");
    debug!("Command line arguments: {:?}", args);

    // Validate arguments
    args.validate()?;

    // Load configuration with layered overrides
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    // Resolve inputs into concrete log files
    let files = resolve_inputs(&args.inputs, &config.analysis.file_pattern)?;
    if files.is_empty() {
        return Err(Error::configuration(format!(
            "No log files matched the given inputs (pattern: '{}')",
            config.analysis.file_pattern
        )));
    }
    info!("Analyzing {} log file(s)", files.len());

    // Analyze files concurrently, bounded by the worker count
    let progress_bar = if args.show_progress() && files.len() > 1 {
        Some(create_progress_bar(
            files.len() as u64,
            "Analyzing logs...",
        ))
    } else {
        None
    };

    let workers = config.performance.parallel_workers;
    let mut analyses: Vec<(PathBuf, Result<FileAnalysis>)> =
        futures::stream::iter(files.into_iter().map(|path| {
            let config = config.clone();
            let progress_bar = progress_bar.clone();
            async move {
                let outcome = analyze_file(&path, &config).await;
                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }
                (path, outcome)
            }
        }))
        .buffer_unordered(workers)
        .collect()
        .await;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    // Unordered completion; restore input order for stable output.
    analyses.sort_by(|a, b| a.0.cmp(&b.0));

    let mut stats = ProcessingStats::default();
    let mut successful = Vec::new();

    for (path, outcome) in analyses {
        match outcome {
            Ok(analysis) => {
                stats.files_analyzed += 1;
                stats.records_completed += analysis.report.stats.records_completed;
                stats.records_stranded += analysis.report.stats.records_stranded;
                stats.lines_scanned += analysis.report.stats.lines_scanned;
                stats.export_sizes.extend(analysis.exports.clone());
                successful.push(analysis);
            }
            Err(e) => {
                stats.errors_encountered += 1;
                match &e {
                    Error::EmptyAnalysis { .. } => {
                        warn!(
                            "{} - no completed records; check that the file is a chain \
                             timing log",
                            e
                        );
                    }
                    _ => error!("Failed to analyze {}: {}", path.display(), e),
                }
                if is_critical_error(&e) {
                    return Err(e);
                }
            }
        }
    }

    // Optional per-record metric dump across all analyzed files
    if let Some(dump_path) = &args.dump_records
        && !successful.is_empty()
    {
        let size = dump_completed_records(dump_path, &successful)?;
        info!("Wrote record dump: {}", dump_path.display());
        stats
            .export_sizes
            .push((dump_path.display().to_string(), size));
    }

    stats.processing_time = start_time.elapsed();

    // Generate final report
    generate_final_report(&args, &successful, &stats)?;

    Ok(stats)
}

/// Load configuration and apply CLI argument overrides
fn load_configuration(args: &AnalyzeArgs) -> Result<Config> {
    let mut config = Config::load()?;

    config.analysis.bin_width_us = args.bin_width_us;
    config.analysis.period_ms = args.period_ms;
    config.analysis.file_pattern = args.pattern.clone();
    config.analysis.output_path = args.output_path.clone();
    config.analysis.no_save = args.no_save;
    if let Some(workers) = args.workers {
        config.performance.parallel_workers = workers;
    }
    config.logging.level = args.get_log_level().to_string();

    config.validate()?;
    config.ensure_output_directory()?;
    Ok(config)
}

/// Reconstruct records from one log file and prepare its outputs
async fn analyze_file(path: &Path, config: &Config) -> Result<FileAnalysis> {
    info!("Analyzing log file: {}", path.display());

    let lines = read_log_lines(path)?;
    let result = assemble_lines(&lines);
    let source = source_stem(path);

    let report = LatencyReport::from_assembly(source, &result, config.analysis.period_ms)?;

    let histograms: Vec<LatencyHistogram> = report
        .series
        .iter()
        .filter_map(|series| {
            LatencyHistogram::build(
                series.title.clone(),
                &series.values,
                config.analysis.bin_width_us,
            )
        })
        .collect();

    // Export histogram CSVs next to the log unless redirected or disabled
    let mut exports = Vec::new();
    if !config.analysis.no_save {
        let export_dir = config
            .analysis
            .output_path
            .clone()
            .or_else(|| path.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        for histogram in &histograms {
            let filename = histogram_csv_filename(&report.source, &histogram.metric);
            let export_path = export_dir.join(&filename);
            let size = write_export(&export_path, &histogram.to_csv())?;
            debug!("Exported histogram: {}", export_path.display());
            exports.push((filename, size));
        }
    }

    info!(
        "Completed {}: {} records, {} stranded",
        path.display(),
        report.stats.records_completed,
        report.stats.records_stranded
    );

    Ok(FileAnalysis {
        report,
        histograms,
        exports,
    })
}

/// Write every completed record's derived metric triple as CSV
fn dump_completed_records(dump_path: &Path, analyses: &[FileAnalysis]) -> Result<u64> {
    let mut out = String::from("source,record,e2e_latency_us,execution_time_us,waiting_time_us\n");

    for analysis in analyses {
        let series = &analysis.report.series;
        if series.len() < 3 {
            continue;
        }
        let rows = series[0]
            .values
            .iter()
            .zip(series[1].values.iter())
            .zip(series[2].values.iter());
        for (index, ((e2e, exec), wait)) in rows.enumerate() {
            out.push_str(&format!(
                "{},{},{:.4},{:.4},{:.4}\n",
                analysis.report.source, index, e2e, exec, wait
            ));
        }
    }

    write_export(dump_path, &out)
}

/// Generate the final report in the requested format
fn generate_final_report(
    args: &AnalyzeArgs,
    analyses: &[FileAnalysis],
    stats: &ProcessingStats,
) -> Result<()> {
    info!("Generating final report");

    match args.output_format {
        OutputFormat::Human => generate_human_report(args, analyses, stats),
        OutputFormat::Json => generate_json_report(analyses, stats),
        OutputFormat::Csv => generate_csv_report(analyses),
    }
}

/// Generate human-readable report with per-file summaries and histograms
fn generate_human_report(
    args: &AnalyzeArgs,
    analyses: &[FileAnalysis],
    stats: &ProcessingStats,
) -> Result<()> {
    for analysis in analyses {
        let report = &analysis.report;

        println!("\n📄 {}", report.source.bold());
        println!("   • {}", report.stats.summary());
        if let Some(minutes) = report.capture_minutes {
            println!("   • Estimated capture duration: {:.2} min", minutes);
        }
        if !report.stranded.is_empty() {
            let ids: Vec<String> = report
                .stranded
                .iter()
                .map(|r| format!("{} ({}/7 fields)", r.identifier, r.required_fields_held()))
                .collect();
            println!(
                "   {} {}",
                "⚠️  Incomplete identifiers:".yellow(),
                ids.join(", ")
            );
        }

        for (summary, histogram) in report.summaries.iter().zip(analysis.histograms.iter()) {
            println!("\n📊 {}", summary.metric.cyan().bold());
            println!("   {}", summary.render_line());
            if !args.quiet {
                print!("{}", histogram.render());
            }
        }
        println!();
    }

    let duration = HumanDuration(stats.processing_time);
    println!("🎉 Chain latency analysis complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Processing Summary:");
    println!("   • Files analyzed: {}", stats.files_analyzed);
    println!("   • Lines scanned: {}", stats.lines_scanned);
    println!("   • Records completed: {}", stats.records_completed);
    println!("   • Records stranded: {}", stats.records_stranded);
    println!("   • Processing time: {}", duration);

    if stats.errors_encountered > 0 {
        println!("⚠️  Errors encountered: {}", stats.errors_encountered);
    }

    if !stats.export_sizes.is_empty() {
        println!("\n📁 Exported Files:");
        for (filename, size) in &stats.export_sizes {
            println!("   • {}: {}", filename, ProcessingStats::format_size(*size));
        }
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(analyses: &[FileAnalysis], stats: &ProcessingStats) -> Result<()> {
    let reports: Vec<serde_json::Value> = analyses
        .iter()
        .map(|analysis| {
            serde_json::to_value(&analysis.report).map_err(|e| {
                Error::report_writing(
                    format!("Failed to serialize report for '{}'", analysis.report.source),
                    std::io::Error::other(e),
                )
            })
        })
        .collect::<Result<_>>()?;

    let json_stats = serde_json::json!({
        "files_analyzed": stats.files_analyzed,
        "records_completed": stats.records_completed,
        "records_stranded": stats.records_stranded,
        "lines_scanned": stats.lines_scanned,
        "errors_encountered": stats.errors_encountered,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "reports": reports,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&json_stats).unwrap_or_default()
    );
    Ok(())
}

/// Generate CSV report for data analysis
fn generate_csv_report(analyses: &[FileAnalysis]) -> Result<()> {
    println!("source,metric,count,mean_us,std_dev_us,min_us,max_us");
    for analysis in analyses {
        for line in analysis.report.render_csv().lines().skip(1) {
            println!("{}", line);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REQUIRED_TIMING_FIELDS;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_complete_log(dir: &Path, name: &str, episodes: u32) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for id in 0..episodes {
            for (i, field) in REQUIRED_TIMING_FIELDS.iter().enumerate() {
                writeln!(
                    file,
                    "ID = {}, {} = {:.2} us",
                    id,
                    field,
                    id as f64 * 1000.0 + i as f64 * 10.0
                )
                .unwrap();
            }
            writeln!(file).unwrap();
        }
        path
    }

    #[tokio::test]
    async fn test_analyze_file_produces_report_and_exports() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_complete_log(temp_dir.path(), "log_Chain 3_tcp.txt", 3);

        let config = Config::default();
        let analysis = analyze_file(&log, &config).await.unwrap();

        assert_eq!(analysis.report.stats.records_completed, 3);
        assert_eq!(analysis.histograms.len(), 3);
        assert_eq!(analysis.exports.len(), 3);
        assert!(
            temp_dir
                .path()
                .join("log_Chain 3_tcp_e2e_latency_histogram.csv")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_analyze_file_no_save_skips_exports() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_complete_log(temp_dir.path(), "log_Chain 4_tcp.txt", 2);

        let mut config = Config::default();
        config.analysis.no_save = true;
        let analysis = analyze_file(&log, &config).await.unwrap();

        assert!(analysis.exports.is_empty());
        assert!(
            !temp_dir
                .path()
                .join("log_Chain 4_tcp_e2e_latency_histogram.csv")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_analyze_file_empty_log_is_distinct_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log_empty.txt");
        std::fs::File::create(&path).unwrap();

        let config = Config::default();
        let err = analyze_file(&path, &config).await.unwrap_err();

        assert!(matches!(err, Error::EmptyAnalysis { .. }));
    }

    #[test]
    fn test_dump_completed_records_shape() {
        let temp_dir = TempDir::new().unwrap();
        let log = write_complete_log(temp_dir.path(), "log_Chain 5_tcp.txt", 2);

        let lines = read_log_lines(&log).unwrap();
        let result = assemble_lines(&lines);
        let report = LatencyReport::from_assembly("log_Chain 5_tcp", &result, None).unwrap();
        let analysis = FileAnalysis {
            report,
            histograms: Vec::new(),
            exports: Vec::new(),
        };

        let dump_path = temp_dir.path().join("records.csv");
        dump_completed_records(&dump_path, &[analysis]).unwrap();

        let content = std::fs::read_to_string(&dump_path).unwrap();
        // Header plus one row per completed record.
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("source,record,e2e_latency_us"));
    }
}
