//! User configuration.
//!
//! Read from `$CLUSTERSEARCH_CONFIG` when set, otherwise from
//! `<config dir>/clustersearch/config.toml`. A missing file means defaults.

use crate::cache::MatchRule;
use crate::error::{Result, SearchError};
use crate::search::SuggestionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CLUSTERSEARCH_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub suggestions: SuggestionOptions,
    pub reconcile: ReconcileConfig,
    pub cache: CacheConfig,
}

/// How deletes are reconciled into cached results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub match_rule: MatchRule,
}

/// Where the cache snapshot lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default snapshot file for commands that take `--cache`.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            SearchError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// The config file path, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("clustersearch").join("config.toml"))
    }
}
