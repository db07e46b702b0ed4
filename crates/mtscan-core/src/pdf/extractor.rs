//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{Result, TextSource};
use crate::error::PdfError;

/// PDF text extractor.
///
/// `lopdf` validates the document and handles empty-password encryption,
/// `pdf-extract` produces the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the document, returning bytes `pdf-extract` can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let bytes = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", pages);
        Ok(bytes)
    }
}

impl TextSource for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let bytes = self.prepare(data)?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfExtractor::new()
            .extract_text(b"Message 1\n:20:ABC\n")
            .unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(PdfExtractor::new().extract_text(&[]).is_err());
    }
}
