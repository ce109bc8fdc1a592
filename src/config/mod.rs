use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, config_file},
    errors::LedgerError,
    quotation::AmountFormat,
    storage::json_backend::write_atomic,
};

pub const DEFAULT_CURRENCY_PREFIX: &str = "Rs.";
pub const DEFAULT_GROUPING_SEPARATOR: char = ',';
pub const DEFAULT_PROPERTY_LABEL: &str = "Rental Property";
pub const DEFAULT_LOG_FILTER: &str = "tenant_ledger=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory holding the JSON store; the application data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_root: Option<PathBuf>,
    pub currency_prefix: String,
    pub grouping_separator: char,
    /// Shown on quotations for tenants without a property.
    pub default_property_label: String,
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_root: None,
            currency_prefix: DEFAULT_CURRENCY_PREFIX.into(),
            grouping_separator: DEFAULT_GROUPING_SEPARATOR,
            default_property_label: DEFAULT_PROPERTY_LABEL.into(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl LedgerConfig {
    pub fn resolve_store_root(&self) -> PathBuf {
        self.store_root.clone().unwrap_or_else(app_data_dir)
    }

    pub fn amount_format(&self) -> AmountFormat {
        AmountFormat::new(self.currency_prefix.clone(), self.grouping_separator)
    }
}

/// Loads and saves [`LedgerConfig`] as a JSON document.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(config_file())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Defaults when no document has been saved yet.
    pub fn load(&self) -> Result<LedgerConfig, LedgerError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(LedgerConfig::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &LedgerConfig) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
