//! Engine configuration.
//!
//! Settings come from the environment; persisted JSON documents are merged
//! over built-in defaults with [`process_config`].

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::paths;

/// Environment variable naming the vault directory.
pub const VAULT_DIR_ENV: &str = "VAULT_AGENT_VAULT_DIR";

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Root of the vault the capabilities operate on.
    pub vault_dir: PathBuf,
    /// Where agent configs are persisted.
    pub storage_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vault_dir: PathBuf::from("."),
            storage_dir: paths::storage_dir(),
        }
    }
}

impl EngineConfig {
    /// Read `VAULT_AGENT_VAULT_DIR` (default: current directory) and
    /// `VAULT_AGENT_STORAGE_DIR` (default: platform data directory).
    pub fn from_env() -> Self {
        let vault_dir = env::var(VAULT_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            vault_dir,
            storage_dir: paths::storage_dir(),
        }
    }

    pub fn with_vault_dir(mut self, vault_dir: impl Into<PathBuf>) -> Self {
        self.vault_dir = vault_dir.into();
        self
    }

    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = storage_dir.into();
        self
    }
}

/// Overlay `config` on `defaults`, recursing into nested objects.
///
/// Keys present in `config` win; `null` values in `config` do not override.
pub fn process_config(config: &Map<String, Value>, defaults: &Map<String, Value>) -> Map<String, Value> {
    let mut result = defaults.clone();
    for (key, value) in config {
        match (result.get_mut(key), value) {
            (_, Value::Null) => {}
            (Some(Value::Object(base)), Value::Object(overlay)) => {
                *base = process_config(overlay, base);
            }
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    result
}
