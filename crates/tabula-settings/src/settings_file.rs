//! Settings file utilities

use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("tabula"))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

pub fn log_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .context("Could not determine local data directory")
        .map(|p| p.join("tabula").join("logs"))
}
