//! Reading command arguments that may come from stdin

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// The argument itself, or stdin when it is `-`
pub fn read_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")
    } else {
        Ok(arg.to_string())
    }
}

/// Parse a JSON argument (or stdin)
pub fn json_arg<T: DeserializeOwned>(arg: &str, what: &str) -> Result<T> {
    let raw = read_arg(arg)?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid {what} JSON"))
}

/// Parse a JSON file
pub fn json_file<T: DeserializeOwned>(path: &std::path::Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid {what} JSON in {:?}", path))
}
