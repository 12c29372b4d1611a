//! Persistence of agent configs.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::config::{AgentConfig, DatabaseSearchFilters};
use crate::capabilities::CapabilityRegistry;
use crate::utilities::config::process_config;
use crate::utilities::errors::ConfigError;
use crate::utilities::file_handler::FileHandler;
use crate::utilities::paths;

/// File holding the saved configs inside the storage directory.
pub const AGENT_CONFIGS_FILE: &str = "agent_configs.json";

/// On-disk shape of an [`AgentConfig`]; tools are stored by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfigRecord {
    pub name: String,
    pub tool_definitions: Vec<String>,
    pub prompt_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_search_filters: Option<DatabaseSearchFilters>,
}

/// Where saved agent configs live.
pub trait AgentConfigStore: Send + Sync {
    /// Saved configs in order; empty when nothing was saved.
    fn load_all(&self) -> Result<Vec<AgentConfig>, ConfigError>;

    fn save_all(&self, configs: &[AgentConfig]) -> Result<(), ConfigError>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Stores configs as a JSON array in `agent_configs.json`.
#[derive(Debug, Clone)]
pub struct JsonFileAgentConfigStore {
    handler: FileHandler,
    registry: Arc<CapabilityRegistry>,
}

impl JsonFileAgentConfigStore {
    pub fn new(directory: impl Into<std::path::PathBuf>) -> Self {
        Self {
            handler: FileHandler::new(directory),
            registry: Arc::new(CapabilityRegistry::builtin().clone()),
        }
    }

    /// Store in [`paths::storage_dir`].
    pub fn in_storage_dir() -> Self {
        Self::new(paths::storage_dir())
    }

    /// Resolve tool names against a custom registry.
    pub fn with_registry(mut self, registry: CapabilityRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.handler.path_of(AGENT_CONFIGS_FILE)
    }
}

/// Fields a saved record may omit.
fn record_defaults() -> Map<String, Value> {
    match json!({
        "name": "Untitled agent",
        "toolDefinitions": [],
        "promptTemplate": "",
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl AgentConfigStore for JsonFileAgentConfigStore {
    fn load_all(&self) -> Result<Vec<AgentConfig>, ConfigError> {
        let Some(document) = self.handler.load(AGENT_CONFIGS_FILE)? else {
            return Ok(Vec::new());
        };

        let items: Vec<Map<String, Value>> = serde_json::from_value(document)?;
        let defaults = record_defaults();
        let configs = items
            .iter()
            .map(|item| -> Result<AgentConfig, ConfigError> {
                let merged = process_config(item, &defaults);
                let record: AgentConfigRecord = serde_json::from_value(Value::Object(merged))?;
                Ok(AgentConfig::from_record(record, &self.registry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Loaded {} agent configs from {}",
            configs.len(),
            self.path().display()
        );
        Ok(configs)
    }

    fn save_all(&self, configs: &[AgentConfig]) -> Result<(), ConfigError> {
        let records: Vec<AgentConfigRecord> = configs.iter().map(AgentConfig::to_record).collect();
        self.handler
            .save(AGENT_CONFIGS_FILE, &serde_json::to_value(records)?)?;
        log::info!("Saved {} agent configs to {}", configs.len(), self.path().display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps configs in memory only.
#[derive(Debug, Default)]
pub struct InMemoryAgentConfigStore {
    configs: RwLock<Vec<AgentConfig>>,
}

impl InMemoryAgentConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configs(configs: Vec<AgentConfig>) -> Self {
        Self {
            configs: RwLock::new(configs),
        }
    }
}

impl AgentConfigStore for InMemoryAgentConfigStore {
    fn load_all(&self) -> Result<Vec<AgentConfig>, ConfigError> {
        Ok(self.configs.read().clone())
    }

    fn save_all(&self, configs: &[AgentConfig]) -> Result<(), ConfigError> {
        *self.configs.write() = configs.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::presets;

    #[test]
    fn test_missing_file_means_no_configs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileAgentConfigStore::new(dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileAgentConfigStore::new(dir.path());
        let configs = presets::example_presets();

        store.save_all(&configs).unwrap();
        assert_eq!(store.load_all().unwrap(), configs);

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["toolDefinitions"][0], "search");
        assert!(raw[1].get("dbSearchFilters").is_none());
    }

    #[test]
    fn test_partial_records_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(AGENT_CONFIGS_FILE),
            r#"[{"name": "Mine", "toolDefinitions": ["search", "unknownTool"]}]"#,
        )
        .unwrap();

        let configs = JsonFileAgentConfigStore::new(dir.path()).load_all().unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name(), "Mine");
        assert_eq!(configs[0].prompt_template(), "");
        assert_eq!(configs[0].tool_definitions().len(), 1);
        assert!(!configs[0].search_enabled());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(AGENT_CONFIGS_FILE), r#"{"not": "a list"}"#).unwrap();
        let store = JsonFileAgentConfigStore::new(dir.path());
        assert!(matches!(store.load_all(), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryAgentConfigStore::new();
        assert!(store.load_all().unwrap().is_empty());
        store.save_all(&presets::example_presets()).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 3);
    }
}
