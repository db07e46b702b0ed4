//! CSV-backed BIC table.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{normalize_code, BicEntry, BicSource, Result};
use crate::error::DirectoryError;

const CODE_HEADERS: &[&str] = &[
    "CODE", "BIC", "CODE BIC", "BIC_CODE", "BIC8", "CODE8", "CODE_BIC", "CODEBIC", "SWIFT",
];
const NAME_HEADERS: &[&str] = &["NOMS", "NOM", "NAME", "BANK", "INSTITUTION", "BANK_NAME"];
const COUNTRY_HEADERS: &[&str] = &["PAYS", "COUNTRY", "COUNTRY_CODE", "ISO3", "ISO_COUNTRY"];

/// Column positions detected from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    code: usize,
    name: usize,
    country: Option<usize>,
    width: usize,
}

/// BIC table stored as a delimited text file with a header row.
#[derive(Debug, Clone)]
pub struct CsvBicSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvBicSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a row to the table, creating the file if needed.
    ///
    /// A directory reading this table only sees the row after it has been
    /// invalidated.
    pub fn append(&self, entry: &BicEntry) -> Result<()> {
        validate_entry(entry)?;

        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_writer(File::create(&self.path).map_err(|source| self.io_error(source))?);
            writer.write_record(["code", "name", "country"])?;
            writer.write_record([
                entry.code.as_str(),
                entry.name.as_str(),
                entry.country.as_deref().unwrap_or(""),
            ])?;
            writer.flush().map_err(|source| self.io_error(source))?;
            return Ok(());
        }

        let columns = {
            let mut reader = self.reader()?;
            let headers = reader.headers()?.clone();
            self.detect_columns(&headers)?
        };

        let mut row = vec![""; columns.width];
        row[columns.code] = entry.code.as_str();
        row[columns.name] = entry.name.as_str();
        if let Some(idx) = columns.country {
            row[idx] = entry.country.as_deref().unwrap_or("");
        }

        let needs_newline = fs::read(&self.path)
            .map_err(|source| self.io_error(source))?
            .last()
            .is_some_and(|b| *b != b'\n');

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        if needs_newline {
            file.write_all(b"\n").map_err(|source| self.io_error(source))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush().map_err(|source| self.io_error(source))?;

        debug!("Appended {} to {}", entry.code, self.path.display());
        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<File>> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file))
    }

    fn detect_columns(&self, headers: &csv::StringRecord) -> Result<Columns> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_uppercase())
            .collect();

        let find = |candidates: &[&str]| {
            normalized
                .iter()
                .position(|h| candidates.contains(&h.as_str()))
        };

        let code = find(CODE_HEADERS).ok_or_else(|| self.missing_column("code", headers))?;
        let country = find(COUNTRY_HEADERS);
        // fall back to the first column that is neither code nor country
        let name = find(NAME_HEADERS)
            .or_else(|| (0..normalized.len()).find(|&i| i != code && Some(i) != country))
            .ok_or_else(|| self.missing_column("name", headers))?;

        Ok(Columns {
            code,
            name,
            country,
            width: normalized.len(),
        })
    }

    fn missing_column(&self, column: &'static str, headers: &csv::StringRecord) -> DirectoryError {
        DirectoryError::MissingColumn {
            path: self.path.clone(),
            column,
            headers: headers.iter().collect::<Vec<_>>().join(", "),
        }
    }

    fn io_error(&self, source: std::io::Error) -> DirectoryError {
        DirectoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BicSource for CsvBicSource {
    fn load(&self) -> Result<Vec<BicEntry>> {
        let mut reader = self.reader()?;
        let headers = reader.headers()?.clone();
        let columns = self.detect_columns(&headers)?;

        let mut entries = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let code = normalize_code(record.get(columns.code).unwrap_or(""));
            let name = record.get(columns.name).unwrap_or("").trim();

            if code.is_empty() {
                continue;
            }
            if name.is_empty() {
                warn!(
                    "Skipping BIC {} on row {} of {}: empty bank name",
                    code,
                    row + 2,
                    self.path.display()
                );
                continue;
            }

            let country = columns.country.and_then(|idx| record.get(idx));
            entries.push(BicEntry::new(&code, &collapse_spaces(name), country));
        }

        Ok(entries)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn validate_entry(entry: &BicEntry) -> Result<()> {
    let invalid = |reason: &str| DirectoryError::InvalidEntry {
        code: entry.code.clone(),
        reason: reason.to_string(),
    };

    if !matches!(entry.code.len(), 8 | 11) || !entry.code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("code must be 8 or 11 alphanumeric characters"));
    }
    if entry.name.is_empty() {
        return Err(invalid("bank name is empty"));
    }
    if let Some(country) = &entry.country {
        if country.len() != 3 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("country must be an ISO3 code"));
        }
    }
    Ok(())
}
