//! Tabula Settings
//!
//! Provides persisted settings plus the ambient setup every Tabula binary
//! shares:
//! - Record paging limits
//! - Column option persistence timing
//! - Access policy sources (permission table and organization overrides)
//! - Filter encoding limits
//! - Logging initialization

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabula_admin::{AccessControl, OrganizationOverrides, PermissionTable};
use tabula_filters::{DEFAULT_MAX_ENCODED_LEN, FilterState};

pub mod logging;
mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TabulaSettings {
    pub records: RecordSettings,
    pub options: OptionSettings,
    pub access: AccessSettings,
    pub filters: FilterSettings,
}

impl TabulaSettings {
    /// Load from the default location, or defaults when there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON in {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    pub default_page_size: u64,
    /// Larger page requests are clamped to this
    pub max_page_size: u64,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            default_page_size: 24,
            max_page_size: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSettings {
    /// How long a column's options must stay unchanged before they're saved
    pub persist_quiet_period_ms: u64,
}

impl Default for OptionSettings {
    fn default() -> Self {
        Self {
            persist_quiet_period_ms: 1000,
        }
    }
}

impl OptionSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.persist_quiet_period_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccessSettings {
    /// JSON permission table; the built-in table when unset
    pub permission_table: Option<PathBuf>,
    /// JSON organization overrides merged over the table
    pub organization_overrides: Option<PathBuf>,
}

impl AccessSettings {
    pub fn permission_table(&self) -> Result<PermissionTable> {
        match &self.permission_table {
            None => Ok(PermissionTable::builtin()),
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read permission table {:?}", path))?;
                PermissionTable::from_json(&json)
                    .with_context(|| format!("Invalid permission table {:?}", path))
            }
        }
    }

    pub fn organization_overrides(&self) -> Result<Option<OrganizationOverrides>> {
        let Some(path) = &self.organization_overrides else {
            return Ok(None);
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read organization overrides {:?}", path))?;
        OrganizationOverrides::from_json(&json)
            .map(Some)
            .with_context(|| format!("Invalid organization overrides {:?}", path))
    }

    /// Access control for the configured table and overrides
    pub fn access_control(&self) -> Result<AccessControl> {
        let table = self.permission_table()?;
        let access = match self.organization_overrides()? {
            Some(overrides) => AccessControl::with_overrides(&table, &overrides),
            None => AccessControl::new(&table),
        };
        tracing::info!(
            version = access.policy().version(),
            organization = ?access.policy().organization_id(),
            "access policy loaded"
        );
        Ok(access)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Longer encoded filters are rejected before decoding
    pub max_encoded_len: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
        }
    }
}

impl FilterSettings {
    pub fn filter_state(&self) -> FilterState {
        FilterState::with_max_encoded_len(self.max_encoded_len)
    }
}
