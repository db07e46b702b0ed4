//! Error types for the mtscan-core library.
//!
//! Extraction itself never fails: malformed blocks, unknown types and
//! unresolved codes are reported as data. Only the collaborators that feed the
//! pipeline (the BIC table and the text source) can produce errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the mtscan library.
#[derive(Error, Debug)]
pub enum MtscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// BIC directory could not be loaded.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while loading or updating the BIC table.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The table file could not be opened or written.
    #[error("cannot access BIC table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid CSV.
    #[error("malformed BIC table: {0}")]
    Csv(#[from] csv::Error),

    /// A required column could not be identified from the header row.
    #[error("BIC table {path} has no {column} column (headers: {headers})")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        headers: String,
    },

    /// An entry rejected before being written to the table.
    #[error("invalid BIC entry {code:?}: {reason}")]
    InvalidEntry { code: String, reason: String },
}

/// Result type for the mtscan library.
pub type Result<T> = std::result::Result<T, MtscanError>;
