//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::message::Direction;

/// Environment variable naming a folder that holds a user-maintained
/// `bic_codes.csv`, taking precedence over `directory.path`.
pub const DATA_DIR_ENV: &str = "MTSCAN_DATA_DIR";

/// File name looked up inside [`DATA_DIR_ENV`].
pub const BIC_TABLE_FILE: &str = "bic_codes.csv";

/// Main configuration for mtscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MtscanConfig {
    /// BIC table configuration.
    pub directory: DirectoryConfig,

    /// Message extraction rules.
    pub extraction: ExtractionConfig,

    /// Text source configuration.
    pub pdf: PdfConfig,
}

/// Where the BIC table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Path to the CSV table (code, bank name, ISO3 country).
    pub path: PathBuf,

    /// Field delimiter of the table.
    pub delimiter: char,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join(BIC_TABLE_FILE),
            delimiter: ',',
        }
    }
}

impl DirectoryConfig {
    /// Table path after applying the data-dir override.
    pub fn resolve_path(&self, data_dir: Option<&Path>) -> PathBuf {
        match data_dir {
            Some(dir) => dir.join(BIC_TABLE_FILE),
            None => self.path.clone(),
        }
    }

    /// Delimiter as a single byte, falling back to `,` for non-ASCII values.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii).unwrap_or(b',')
    }
}

/// Message extraction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Direction used when the caller does not give one.
    pub default_direction: Direction,

    /// MT910 applicant codes (`:50A:`) marking internal transfers.
    pub excluded_applicant_codes: Vec<String>,

    /// Substrings of MT103 `:53A:`/`:54A:`/`:57A:` that exclude the message.
    pub excluded_intermediary_patterns: Vec<String>,

    /// Label words rejected as party names, on top of the built-in set.
    pub extra_placeholder_words: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_direction: Direction::Incoming,
            excluded_applicant_codes: vec!["BEACCMCX091".to_string()],
            excluded_intermediary_patterns: vec![
                "BANQUE DE FRANCE".to_string(),
                "FW021083459".to_string(),
            ],
            extra_placeholder_words: Vec::new(),
        }
    }
}

/// Text normalisation applied to extracted PDF text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Drop `Page N of M` lines injected by the extractor.
    pub strip_page_markers: bool,

    /// Collapse runs of blank lines to a single blank line.
    pub collapse_blank_lines: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            strip_page_markers: true,
            collapse_blank_lines: true,
        }
    }
}

impl MtscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
