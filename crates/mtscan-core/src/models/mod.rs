//! Data models for mtscan.

pub mod config;
pub mod message;

pub use config::{DirectoryConfig, ExtractionConfig, MtscanConfig, PdfConfig};
pub use message::{
    BatchReport, BlockRef, Direction, DocumentReport, DocumentStats, ExtractedRecord,
    MessageType, MissingCodesReport,
};
