//! Subcommands of the `mtscan` binary.

pub mod batch;
pub mod config;
pub mod context;
pub mod directory;
pub mod output;
pub mod process;
