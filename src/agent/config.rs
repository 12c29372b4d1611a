//! Agent configuration: which capabilities the agent may use, its prompt
//! template and its knowledge-base search filters.
//!
//! An [`AgentConfig`] is an immutable value. Every settings change produces
//! a new config; the conversation loop swaps it in wholesale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::presets;
use super::prompt;
use super::storage::{AgentConfigRecord, AgentConfigStore};
use crate::capabilities::{CapabilityDefinition, CapabilityRegistry};
use crate::knowledge::SearchOptions;
use crate::tools::structured_tool::ToolSchema;
use crate::utilities::errors::{ConfigError, ValidationError};

/// Result limit installed when search is switched on.
pub const DEFAULT_FILTER_LIMIT: usize = 33;

// ---------------------------------------------------------------------------
// DatabaseSearchFilters
// ---------------------------------------------------------------------------

/// Filters applied to knowledge-base retrieval. `limit` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSearchFilters {
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<DateTime<Utc>>,
    #[serde(default = "default_pass_full_note")]
    pub pass_full_note_into_context: bool,
}

fn default_pass_full_note() -> bool {
    true
}

impl Default for DatabaseSearchFilters {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FILTER_LIMIT,
            min_date: None,
            max_date: None,
            pass_full_note_into_context: true,
        }
    }
}

impl DatabaseSearchFilters {
    pub fn to_search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            pass_full_note_into_context: self.pass_full_note_into_context,
            min_date: self.min_date,
            max_date: self.max_date,
        }
    }
}

// ---------------------------------------------------------------------------
// AgentConfig
// ---------------------------------------------------------------------------

/// Configuration of the agent driving one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    name: String,
    tool_definitions: Vec<CapabilityDefinition>,
    prompt_template: String,
    db_search_filters: Option<DatabaseSearchFilters>,
}

impl AgentConfig {
    /// Build a config; duplicate tools (by name) keep their first occurrence.
    pub fn new(
        name: impl Into<String>,
        tool_definitions: Vec<CapabilityDefinition>,
        prompt_template: impl Into<String>,
        db_search_filters: Option<DatabaseSearchFilters>,
    ) -> Self {
        Self {
            name: name.into(),
            tool_definitions: dedupe(tool_definitions),
            prompt_template: prompt_template.into(),
            db_search_filters,
        }
    }

    /// First persisted config, or the first example preset when nothing is
    /// stored or the store cannot be read.
    pub fn create_default(store: &dyn AgentConfigStore) -> Self {
        match store.load_all() {
            Ok(configs) => match configs.into_iter().next() {
                Some(config) => {
                    log::debug!("Using persisted agent config '{}'", config.name);
                    config
                }
                None => presets::default_preset(),
            },
            Err(e) => {
                log::warn!("Could not load agent configs, using preset: {}", e);
                presets::default_preset()
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool_definitions(&self) -> &[CapabilityDefinition] {
        &self.tool_definitions
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn db_search_filters(&self) -> Option<&DatabaseSearchFilters> {
        self.db_search_filters.as_ref()
    }

    // -- pure updates ------------------------------------------------------

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Replace the enabled capability subset.
    pub fn with_tools(&self, tools: Vec<CapabilityDefinition>) -> Self {
        Self {
            tool_definitions: dedupe(tools),
            ..self.clone()
        }
    }

    pub fn with_prompt(&self, template: impl Into<String>) -> Self {
        Self {
            prompt_template: template.into(),
            ..self.clone()
        }
    }

    /// Switching on installs the default filters; switching off removes the
    /// filters entirely.
    pub fn with_search_enabled(&self, enabled: bool) -> Self {
        Self {
            db_search_filters: enabled.then(DatabaseSearchFilters::default),
            ..self.clone()
        }
    }

    pub fn with_search_filters(&self, filters: DatabaseSearchFilters) -> Self {
        Self {
            db_search_filters: Some(filters),
            ..self.clone()
        }
    }

    // -- derived views -----------------------------------------------------

    pub fn enables(&self, capability: &str) -> bool {
        self.tool_definitions.iter().any(|d| d.name == capability)
    }

    pub fn search_enabled(&self) -> bool {
        self.db_search_filters.is_some()
    }

    pub fn search_options(&self) -> Option<SearchOptions> {
        self.db_search_filters
            .as_ref()
            .map(DatabaseSearchFilters::to_search_options)
    }

    /// Tool specifications of the enabled subset, for the model request.
    pub fn tool_specs(&self) -> Result<Vec<Value>, ValidationError> {
        self.tool_definitions
            .iter()
            .map(|def| ToolSchema::build(def).map(|schema| schema.to_tool_spec()))
            .collect()
    }

    pub fn render_prompt(&self, inputs: &HashMap<String, String>) -> Result<String, ConfigError> {
        prompt::interpolate(&self.prompt_template, inputs)
    }

    // -- persistence -------------------------------------------------------

    /// Persisted form: tools are stored by name.
    pub fn to_record(&self) -> AgentConfigRecord {
        AgentConfigRecord {
            name: self.name.clone(),
            tool_definitions: self.tool_definitions.iter().map(|d| d.name.clone()).collect(),
            prompt_template: self.prompt_template.clone(),
            db_search_filters: self.db_search_filters.clone(),
        }
    }

    /// Rebuild from the persisted form, resolving tool names against
    /// `registry`. Unknown names are dropped.
    pub fn from_record(record: AgentConfigRecord, registry: &CapabilityRegistry) -> Self {
        let tools = record
            .tool_definitions
            .iter()
            .filter_map(|name| match registry.lookup(name) {
                Ok(def) => Some(def.clone()),
                Err(e) => {
                    log::warn!("Agent config '{}': dropping tool: {}", record.name, e);
                    None
                }
            })
            .collect();
        Self::new(
            record.name,
            tools,
            record.prompt_template,
            record.db_search_filters,
        )
    }
}

fn dedupe(tools: Vec<CapabilityDefinition>) -> Vec<CapabilityDefinition> {
    let mut out: Vec<CapabilityDefinition> = Vec::with_capacity(tools.len());
    for tool in tools {
        if !out.iter().any(|t| t.name == tool.name) {
            out.push(tool);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::storage::InMemoryAgentConfigStore;
    use crate::capabilities::builtin;

    fn config() -> AgentConfig {
        AgentConfig::new(
            "Test",
            vec![builtin::search(), builtin::read_file()],
            "You help {user}.",
            None,
        )
    }

    #[test]
    fn test_search_toggle() {
        let base = config();
        let on = base.with_search_enabled(true);
        assert_eq!(
            on.db_search_filters(),
            Some(&DatabaseSearchFilters {
                limit: 33,
                min_date: None,
                max_date: None,
                pass_full_note_into_context: true,
            })
        );
        let off = on.with_search_enabled(false);
        assert!(off.db_search_filters().is_none());
        assert!(!off.search_enabled());
        // Inputs are untouched.
        assert!(base.db_search_filters().is_none());
        assert!(on.search_enabled());
    }

    #[test]
    fn test_updates_are_pure() {
        let base = config();
        let updated = base
            .with_prompt("New prompt")
            .with_tools(vec![builtin::list_files(), builtin::list_files()]);

        assert_eq!(base.prompt_template(), "You help {user}.");
        assert_eq!(base.tool_definitions().len(), 2);
        assert_eq!(updated.prompt_template(), "New prompt");
        assert_eq!(updated.tool_definitions().len(), 1);
        assert!(updated.enables("listFiles"));
        assert!(!updated.enables("search"));
    }

    #[test]
    fn test_search_filters_map_to_options() {
        let filters = DatabaseSearchFilters {
            limit: 5,
            pass_full_note_into_context: false,
            ..DatabaseSearchFilters::default()
        };
        let cfg = config().with_search_filters(filters);
        let options = cfg.search_options().unwrap();
        assert_eq!(options.limit, 5);
        assert!(!options.pass_full_note_into_context);
        assert!(config().search_options().is_none());
    }

    #[test]
    fn test_tool_specs_and_prompt() {
        let cfg = config();
        let specs = cfg.tool_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0]["function"]["name"], "search");

        let mut inputs = HashMap::new();
        inputs.insert("user".to_string(), "Ada".to_string());
        assert_eq!(cfg.render_prompt(&inputs).unwrap(), "You help Ada.");
        assert!(cfg.render_prompt(&HashMap::new()).is_err());
    }

    #[test]
    fn test_record_roundtrip_drops_unknown_tools() {
        let mut record = config().with_search_enabled(true).to_record();
        assert_eq!(record.tool_definitions, vec!["search", "readFile"]);

        record.tool_definitions.push("launchRockets".into());
        let restored = AgentConfig::from_record(record, CapabilityRegistry::builtin());
        assert_eq!(restored, config().with_search_enabled(true));
    }

    #[test]
    fn test_create_default() {
        let empty = InMemoryAgentConfigStore::new();
        assert_eq!(
            AgentConfig::create_default(&empty),
            presets::example_presets()[0]
        );

        let stored = InMemoryAgentConfigStore::with_configs(vec![config()]);
        assert_eq!(AgentConfig::create_default(&stored), config());
    }

    struct BrokenStore;

    impl AgentConfigStore for BrokenStore {
        fn load_all(&self) -> Result<Vec<AgentConfig>, ConfigError> {
            Err(ConfigError::Storage(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        fn save_all(&self, _: &[AgentConfig]) -> Result<(), ConfigError> {
            Ok(())
        }
    }

    #[test]
    fn test_create_default_falls_back_on_store_error() {
        assert_eq!(
            AgentConfig::create_default(&BrokenStore),
            presets::default_preset()
        );
    }
}
