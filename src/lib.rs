//! # vault-agent
//!
//! Tool invocation engine for a conversational agent working over a personal
//! notes vault.
//!
//! The agent emits tool calls by name with an argument bag. The engine
//! resolves the name against a static capability registry, validates the
//! arguments against the capability's declared schema, runs the capability
//! against the file-system and knowledge-search collaborators, and returns a
//! result envelope tagged with the call id. Failures never escape as panics;
//! they come back as error envelopes.
//!
//! The agent configuration model (enabled tools, prompt template, search
//! filters) lives in [`agent`].

pub mod agent;
pub mod capabilities;
pub mod interfaces;
pub mod knowledge;
pub mod tools;
pub mod utilities;

pub use agent::{AgentConfig, AgentConfigStore, DatabaseSearchFilters};
pub use capabilities::{CapabilityDefinition, CapabilityParameter, CapabilityRegistry, ParamType};
pub use interfaces::{FileSystemService, VaultRootAccessor};
pub use knowledge::{KnowledgeSearch, SearchOptions};
pub use tools::{CallRequest, ResultEnvelope, ToolContext, ToolDispatcher, ToolResultPart};
pub use utilities::errors::{
    CapabilityError, DispatchError, RegistryError, UnknownCapabilityError, ValidationError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
