//! Batch processing command for multiple exports.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use mtscan_core::models::PdfConfig;
use mtscan_core::{load_document, BatchReport, Direction, DocumentReport, Pipeline};

use super::context::{build_pipeline, document_name, load_config};
use super::output::{format_report, write_missing_csv, write_records_csv, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document layout (default: from config)
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv and missing_codes.csv
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// BIC table (CSV)
    #[arg(long)]
    directory: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Result<DocumentReport, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let direction = args.direction.unwrap_or(config.extraction.default_direction);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = Arc::new(build_pipeline(&config, args.directory.as_deref()));
    // An unreadable table fails the run before any file is read.
    pipeline.directory().snapshot()?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let pipeline = Arc::clone(&pipeline);
        let pdf = config.pdf.clone();
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let report = process_single_file(&pipeline, &path, direction, &pdf).map_err(|e| e.to_string());
            pb.inc(1);
            ProcessResult { path, report }
        }));
    }

    // Joined in input order, so the merged report does not depend on scheduling.
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    pb.finish_and_clear();

    let mut batch = BatchReport::new();
    let mut failed = Vec::new();

    for result in results {
        match result.report {
            Ok(report) => {
                if let Some(output_dir) = &args.output_dir {
                    let output_path = output_dir.join(output_name(&result.path, args.format));
                    fs::write(&output_path, format_report(&report, args.format)?)?;
                    debug!("Wrote output to {}", output_path.display());
                }
                batch.merge(report);
            }
            Err(message) if args.continue_on_error => {
                warn!("Failed to process {}: {}", result.path.display(), message);
                failed.push((result.path, message));
            }
            Err(message) => {
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
    }

    if args.summary {
        let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let summary_path = output_dir.join("summary.csv");
        let missing_path = output_dir.join("missing_codes.csv");

        write_records_csv(&summary_path, &batch.records)?;
        write_missing_csv(&missing_path, &batch.missing)?;
        eprintln!(
            "{} Summary written to {} and {}",
            style("✓").green(),
            summary_path.display(),
            missing_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        batch.documents + failed.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} records, {} excluded, {} unknown blocks",
        style(batch.stats.records).green(),
        batch.stats.excluded,
        batch.stats.unknown
    );
    eprintln!(
        "   {} unmapped codes, {} records without code",
        style(batch.missing.unmapped.len()).yellow(),
        style(batch.missing.empty.len()).yellow()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in &failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }

    Ok(())
}

/// Per-file output name. The source extension is kept, so `a.pdf` and
/// `a.txt` in one batch write `a.pdf.json` and `a.txt.json`.
fn output_name(path: &Path, format: OutputFormat) -> String {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("report");
    format!("{}.{}", name, format.extension())
}

fn process_single_file(
    pipeline: &Pipeline,
    path: &Path,
    direction: Direction,
    pdf: &PdfConfig,
) -> anyhow::Result<DocumentReport> {
    let text = load_document(path, pdf)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text extracted");
    }

    Ok(pipeline.process_document(&document_name(path), &text, direction)?)
}
