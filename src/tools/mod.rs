//! Tool invocation: call requests, schema validation, capability
//! implementations and the dispatcher that ties them together.
//!
//! A call flows through [`tool_calling::CallRequest`] →
//! [`structured_tool::ToolSchema::validate`] →
//! [`agent_tools::CapabilityKind::execute`] and comes back as a
//! [`tool_types::ResultEnvelope`], all driven by [`ToolDispatcher`].

pub mod agent_tools;
pub mod structured_tool;
pub mod tool_calling;
pub mod tool_types;
pub mod tool_usage;

// Re-exports for convenience
pub use agent_tools::{CapabilityKind, ToolContext};
pub use structured_tool::{ParamValue, ToolSchema, ValidatedArgs};
pub use tool_calling::{CallRequest, RawArguments};
pub use tool_types::{ResultEnvelope, ToolOutcome, ToolResultPart};
pub use tool_usage::ToolDispatcher;
