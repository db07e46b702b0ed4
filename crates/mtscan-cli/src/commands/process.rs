//! Process command - extract messages from a single export.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use mtscan_core::{load_document, Direction};

use super::context::{build_pipeline, document_name, load_config};
use super::output::{format_missing, format_report, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Document layout (default: from config)
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// BIC table (CSV)
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Keep only messages with this value date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the missing-codes report to stderr
    #[arg(long)]
    missing: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let direction = args.direction.unwrap_or(config.extraction.default_direction);
    info!("Processing {} as {}", args.input.display(), direction);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let text = load_document(&args.input, &config.pdf)?;
    if text.trim().is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    }

    pb.set_message("Extracting messages...");
    let pipeline = build_pipeline(&config, args.directory.as_deref());
    let mut report = pipeline.process_document(&document_name(&args.input), &text, direction)?;
    pb.finish_and_clear();

    if let Some(date) = args.date {
        report.retain_date(date);
    }

    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.missing {
        eprintln!();
        eprint!("{}", format_missing(&report.missing));
    }

    let flagged = report.records.iter().filter(|r| !r.warnings.is_empty()).count();
    if flagged > 0 {
        eprintln!(
            "{} {} record(s) flagged for review",
            style("!").yellow(),
            flagged
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
