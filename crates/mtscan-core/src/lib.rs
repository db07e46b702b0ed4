//! Core library for SWIFT MT message extraction.
//!
//! This crate provides:
//! - Text source (PDF to line-oriented text)
//! - Message segmentation and MT202/MT103/MT910 classification
//! - Direction-dependent field extraction
//! - BIC directory with versioned reload, and record enrichment
//! - Per-document reports with missing-code tracking

pub mod directory;
pub mod error;
pub mod message;
pub mod models;
pub mod pdf;

pub use directory::{BicDirectory, BicEntry, BicSource, CsvBicSource, DirectorySnapshot, MemoryBicSource};
pub use error::{DirectoryError, MtscanError, PdfError, Result};
pub use message::{classify, segment, Enricher, Pipeline};
pub use models::{
    BatchReport, BlockRef, Direction, DocumentReport, DocumentStats, ExtractedRecord, MessageType,
    MissingCodesReport, MtscanConfig,
};
pub use pdf::{load_document, normalize_text, TextSource};
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
