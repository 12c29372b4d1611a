//! Agent configuration model.
//!
//! Which capabilities the conversational agent may use, the prompt template
//! it runs with and the knowledge-base search filters, plus where saved
//! configurations are kept.

pub mod config;
pub mod presets;
pub mod prompt;
pub mod storage;

pub use self::config::{AgentConfig, DatabaseSearchFilters, DEFAULT_FILTER_LIMIT};
pub use self::presets::{default_preset, example_presets};
pub use self::storage::{
    AgentConfigRecord, AgentConfigStore, InMemoryAgentConfigStore, JsonFileAgentConfigStore,
};
