//! # Capability Registry
//!
//! Declarative catalog of the capabilities an agent may invoke against the
//! user's vault. Each [`CapabilityDefinition`] carries the parameter schema
//! (name, type, optional default, description) and the auto-execute flag.
//!
//! The catalog is data: the validator in [`crate::tools::structured_tool`]
//! interprets it, and the same definitions are published to the model as
//! tool specifications.

pub mod builtin;
pub mod capability;
pub mod registry;

pub use builtin::DEFAULT_SEARCH_LIMIT;
pub use capability::{CapabilityDefinition, CapabilityParameter, ParamType};
pub use registry::CapabilityRegistry;
