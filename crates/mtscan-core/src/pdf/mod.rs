//! Text source: PDF documents to line-oriented text.

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::PdfExtractor;

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::PdfError;
use crate::models::PdfConfig;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

lazy_static! {
    static ref PAGE_MARKER: Regex = Regex::new(r"(?mi)^[ \t]*page[ \t]+\d+[ \t]*(?:of[ \t]*\d+)?[ \t]*$").unwrap();
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Trait for anything that turns a document into text.
pub trait TextSource {
    /// Extract the full text of a document held in memory.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Clean extractor output before segmentation.
///
/// Carriage returns become line feeds, `Page N of M` lines are blanked and
/// runs of blank lines are collapsed to one, each step gated by `config`.
pub fn normalize_text(text: &str, config: &PdfConfig) -> String {
    let mut text = text.replace("\r\n", "\n").replace('\r', "\n");

    if config.strip_page_markers {
        text = PAGE_MARKER.replace_all(&text, "").into_owned();
    }
    if config.collapse_blank_lines {
        text = BLANK_RUN.replace_all(&text, "\n\n").into_owned();
    }

    text
}

/// Read a document as normalised text.
///
/// `.pdf` files go through [`PdfExtractor`]; anything else is taken to be
/// text that was already extracted.
pub fn load_document(path: &Path, config: &PdfConfig) -> crate::Result<String> {
    let data = std::fs::read(path)?;
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let raw = if is_pdf {
        extract_pdf(&data)?
    } else {
        String::from_utf8_lossy(&data).into_owned()
    };
    debug!("Read {} characters from {}", raw.len(), path.display());

    Ok(normalize_text(&raw, config))
}

#[cfg(feature = "pdf")]
fn extract_pdf(data: &[u8]) -> crate::Result<String> {
    Ok(PdfExtractor::new().extract_text(data)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_data: &[u8]) -> crate::Result<String> {
    Err(crate::error::MtscanError::Config("built without PDF support".to_string()))
}
