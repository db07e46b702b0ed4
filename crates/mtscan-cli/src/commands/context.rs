//! Configuration and directory setup shared by the subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use mtscan_core::models::config::DATA_DIR_ENV;
use mtscan_core::{BicDirectory, CsvBicSource, MtscanConfig, Pipeline};

/// Platform config file: `<config_dir>/mtscan/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mtscan")
        .join("config.json")
}

/// `--config` when given, else the platform config file.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration.
///
/// An explicit `--config` file must exist; the platform file is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<MtscanConfig> {
    let path = config_path(explicit);

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        return Ok(MtscanConfig::from_file(&path)?);
    }
    if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    Ok(MtscanConfig::default())
}

/// BIC table path: `--directory`, then `MTSCAN_DATA_DIR`, then the config.
pub fn table_path(config: &MtscanConfig, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    config.directory.resolve_path(data_dir.as_deref())
}

pub fn bic_source(config: &MtscanConfig, explicit: Option<&Path>) -> CsvBicSource {
    let path = table_path(config, explicit);
    debug!("Using BIC table {}", path.display());
    CsvBicSource::new(path).with_delimiter(config.directory.delimiter_byte())
}

pub fn build_pipeline(config: &MtscanConfig, explicit: Option<&Path>) -> Pipeline {
    let directory = BicDirectory::new(bic_source(config, explicit));
    Pipeline::new(Arc::new(directory), config.extraction.clone())
}

/// Display name of an input file.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
