//! Rendering of reports for downstream tools.

use std::path::Path;

use mtscan_core::{DocumentReport, ExtractedRecord, MissingCodesReport};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (records only)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

const RECORD_HEADERS: [&str; 16] = [
    "document",
    "message",
    "type",
    "direction",
    "reference",
    "related_reference",
    "value_date",
    "currency",
    "amount",
    "bank_code",
    "ordering_party_code",
    "ordering_party_name",
    "beneficiary",
    "country",
    "lines",
    "warnings",
];

pub fn format_report(report: &DocumentReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => records_csv(&report.records),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn record_row(record: &ExtractedRecord) -> [String; 16] {
    [
        record.source.document.clone(),
        record.source.index.to_string(),
        record.type_label(),
        record.direction.to_string(),
        opt(&record.reference).to_string(),
        opt(&record.related_reference).to_string(),
        record.value_date.map(|d| d.to_string()).unwrap_or_default(),
        opt(&record.currency).to_string(),
        record.amount.map(|a| a.to_string()).unwrap_or_default(),
        opt(&record.bank_code).to_string(),
        opt(&record.ordering_party_code).to_string(),
        opt(&record.ordering_party_name).to_string(),
        opt(&record.beneficiary).to_string(),
        opt(&record.country).to_string(),
        format!("{}-{}", record.source.start_line, record.source.end_line),
        record.warnings.join("; "),
    ]
}

fn write_records<W: std::io::Write>(wtr: &mut csv::Writer<W>, records: &[ExtractedRecord]) -> anyhow::Result<()> {
    wtr.write_record(RECORD_HEADERS)?;
    for record in records {
        wtr.write_record(record_row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn records_csv(records: &[ExtractedRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    write_records(&mut wtr, records)?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn write_records_csv(path: &Path, records: &[ExtractedRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_records(&mut wtr, records)
}

/// Missing codes as `kind,value` rows, unmapped codes first.
pub fn write_missing_csv(path: &Path, missing: &MissingCodesReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["kind", "value"])?;
    for code in &missing.unmapped {
        wtr.write_record(["unmapped", code.as_str()])?;
    }
    for marker in &missing.empty {
        wtr.write_record(["empty", marker.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn format_missing(missing: &MissingCodesReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Unmapped codes ({}):\n", missing.unmapped.len()));
    for code in &missing.unmapped {
        output.push_str(&format!("  {}\n", code));
    }
    output.push_str(&format!("Empty codes ({}):\n", missing.empty.len()));
    for marker in &missing.empty {
        output.push_str(&format!("  {}\n", marker));
    }

    output
}

fn format_text(report: &DocumentReport) -> String {
    let mut output = String::new();
    let stats = &report.stats;

    output.push_str(&format!("Document: {} ({})\n", report.source, report.direction));
    output.push_str(&format!(
        "Blocks: {} ({} empty, {} unknown, {} excluded)\n",
        stats.blocks, stats.discarded_empty, stats.unknown, stats.excluded
    ));
    output.push_str(&format!("Records: {}\n", stats.records));

    for record in &report.records {
        output.push('\n');
        output.push_str(&format!(
            "[{}] {} {}\n",
            record.source.index,
            record.type_label(),
            opt(&record.reference)
        ));
        if let (Some(amount), Some(currency)) = (&record.amount, &record.currency) {
            output.push_str(&format!("  Amount: {} {}\n", amount, currency));
        }
        if let Some(date) = record.value_date {
            output.push_str(&format!("  Value date: {}\n", date));
        }
        let party = record
            .ordering_party_name
            .as_deref()
            .or(record.ordering_party_code.as_deref())
            .unwrap_or("-");
        output.push_str(&format!("  Ordering party: {}\n", party));
        if let Some(country) = &record.country {
            output.push_str(&format!("  Country: {}\n", country));
        }
        if let Some(beneficiary) = &record.beneficiary {
            output.push_str(&format!("  Beneficiary: {}\n", beneficiary));
        }
        for warning in &record.warnings {
            output.push_str(&format!("  Review: {}\n", warning));
        }
    }

    if !report.missing.is_empty() {
        output.push('\n');
        output.push_str(&format_missing(&report.missing));
    }

    output
}
