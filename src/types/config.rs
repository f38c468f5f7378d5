//! Configuration structures.
//!
//! Defaults cover a local layout under `data/`; `Config::from_env` overlays
//! `MAITRE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{Error, Result};

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog store, ledger and audit log locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog query engine limits.
    #[serde(default)]
    pub query: QueryConfig,

    /// Catalog generator defaults.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local catalog store.
    pub catalog_root: PathBuf,

    /// Key of the structured catalog document inside the catalog store.
    pub metadata_key: String,

    /// Key prefix under which description artifacts are stored.
    pub descriptions_prefix: String,

    /// SQLite file backing the reservation ledger.
    pub ledger_path: PathBuf,

    /// SQLite file backing the query audit log.
    pub audit_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from("data"),
            metadata_key: "restaurant-metadata.json".to_string(),
            descriptions_prefix: "descriptions".to_string(),
            ledger_path: PathBuf::from("data/reservations.db"),
            audit_path: PathBuf::from("data/query-audit.db"),
        }
    }
}

/// Query engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of rows serialized back to the caller. The caller
    /// channel has a bounded payload size.
    pub max_results: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { max_results: 50 }
    }
}

/// Generator defaults used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub default_seed: u64,
    pub default_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_seed: 123,
            default_count: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `MAITRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("MAITRE_CATALOG_ROOT") {
            config.storage.catalog_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAITRE_METADATA_KEY") {
            config.storage.metadata_key = v;
        }
        if let Some(v) = lookup("MAITRE_DESCRIPTIONS_PREFIX") {
            config.storage.descriptions_prefix = v;
        }
        if let Some(v) = lookup("MAITRE_LEDGER_PATH") {
            config.storage.ledger_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAITRE_AUDIT_PATH") {
            config.storage.audit_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MAITRE_QUERY_MAX_RESULTS") {
            config.query.max_results = v.parse().map_err(|_| {
                Error::config(format!("MAITRE_QUERY_MAX_RESULTS must be an integer, got '{}'", v))
            })?;
        }
        if let Some(v) = lookup("MAITRE_LOG_LEVEL") {
            config.observability.log_level = v;
        }
        if let Some(v) = lookup("MAITRE_LOG_FORMAT") {
            config.observability.json_logs = v.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }
}
