//! User preferences persisted as `config/config.json` under the app home.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::{
    collation::Collation,
    services::{PaymentFilters, SortField, SortOrder},
    utils::{ensure_dir, PathResolver},
};
use crate::errors::StorageError;
use crate::storage::file_store::write_atomic;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_label: String,
    pub default_sort_by: SortField,
    pub default_sort_order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pl-PL".into(),
            currency_label: "zł".into(),
            default_sort_by: SortField::Date,
            default_sort_order: SortOrder::Desc,
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Filters the payments list starts with; merchant order follows `locale`.
    pub fn initial_filters(&self) -> PaymentFilters {
        PaymentFilters::new(self.default_sort_by, self.default_sort_order)
            .with_collation(Collation::for_locale(&self.locale))
    }

    pub fn data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }

    pub fn export_dir(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(base))
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, falling back to defaults when it does not exist yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        let filters = config.initial_filters();
        assert_eq!(filters.sort_by, SortField::Date);
        assert_eq!(filters.order, SortOrder::Desc);
        assert_eq!(filters.collation, Collation::Polish);

        let english = Config {
            locale: "en-GB".into(),
            ..Config::default()
        };
        assert_eq!(english.initial_filters().collation, Collation::Root);
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            currency_label: "PLN".into(),
            default_sort_by: SortField::Price,
            default_sort_order: SortOrder::Asc,
            export_dir: Some(dir.path().join("out")),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert_eq!(config.export_dir(dir.path()), dir.path().join("out"));
        assert_eq!(config.data_dir(dir.path()), dir.path().join("data"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency_label": "EUR"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_label, "EUR");
        assert_eq!(config.default_sort_order, SortOrder::Desc);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{oops").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }
}
