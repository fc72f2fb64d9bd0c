//! Application configuration
//!
//! Layered with the `config` crate: embedded defaults, then optional
//! `config/local.toml`, then `TSLITE_*` environment variables.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tslite_client::schema::PRESET_NAMES;
use tslite_client::{ClientConfig, FieldMapping};
use tslite_history::{default_data_dir, HistoryConfig, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub history: HistorySettings,
}

/// Classification service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub endpoints: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Preset mapping name (v1, v2, hs)
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Full mapping table; wins over `schema`
    #[serde(default)]
    pub field_mapping: Option<FieldMapping>,
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_schema() -> String {
    "v2".to_string()
}

impl ServiceConfig {
    /// Build the orchestrator configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mapping = match &self.field_mapping {
            Some(mapping) => mapping.clone(),
            None => match FieldMapping::preset(&self.schema) {
                Some(mapping) => mapping,
                None => bail!(
                    "unknown service schema '{}' (expected one of: {})",
                    self.schema,
                    PRESET_NAMES.join(", ")
                ),
            },
        };

        if self.timeout_ms == 0 {
            bail!("service.timeout_ms must be greater than zero");
        }

        Ok(ClientConfig::new()
            .with_base_url(self.base_url.clone())
            .with_endpoints(self.endpoints.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_field_mapping(mapping))
    }
}

/// History settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_history_key")]
    pub key: String,
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

fn default_history_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: default_history_key(),
            capacity: default_history_capacity(),
        }
    }
}

impl HistorySettings {
    /// Directory holding the history file
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir)
    }

    /// Store configuration
    pub fn store_config(&self) -> HistoryConfig {
        HistoryConfig {
            key: self.key.clone(),
            capacity: self.capacity,
        }
    }
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. Local overrides (optional)
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        .add_source(
            Environment::with_prefix("TSLITE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("service.endpoints")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
