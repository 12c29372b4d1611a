//! Capability registry: the static catalog the dispatcher resolves against.
//!
//! The registry is validated when it is built. Duplicate names and schemas
//! that cannot be compiled are authoring bugs and fail construction instead
//! of surfacing on the first call that happens to hit them.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde_json::Value;

use super::builtin;
use super::capability::CapabilityDefinition;
use crate::tools::structured_tool::ToolSchema;
use crate::utilities::errors::{RegistryError, UnknownCapabilityError};

static BUILTIN: Lazy<CapabilityRegistry> = Lazy::new(|| {
    match CapabilityRegistry::new(builtin::all()) {
        Ok(registry) => registry,
        Err(e) => panic!("built-in capability catalog is invalid: {}", e),
    }
});

/// An immutable, ordered set of capability definitions with their compiled
/// schemas.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    definitions: Vec<CapabilityDefinition>,
    schemas: Vec<ToolSchema>,
}

impl CapabilityRegistry {
    /// Build a registry, checking every definition.
    pub fn new(definitions: Vec<CapabilityDefinition>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        let mut schemas = Vec::with_capacity(definitions.len());

        for definition in &definitions {
            if !names.insert(definition.name.as_str()) {
                return Err(RegistryError::DuplicateCapability {
                    name: definition.name.clone(),
                });
            }

            let mut params = HashSet::new();
            for parameter in &definition.parameters {
                if !params.insert(parameter.name.as_str()) {
                    return Err(RegistryError::DuplicateParameter {
                        capability: definition.name.clone(),
                        parameter: parameter.name.clone(),
                    });
                }
            }

            let schema =
                ToolSchema::build(definition).map_err(|source| RegistryError::InvalidSchema {
                    capability: definition.name.clone(),
                    source,
                })?;
            schemas.push(schema);
        }

        Ok(Self {
            definitions,
            schemas,
        })
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static CapabilityRegistry {
        &BUILTIN
    }

    /// All definitions in registration order.
    pub fn list(&self) -> &[CapabilityDefinition] {
        &self.definitions
    }

    pub fn lookup(&self, name: &str) -> Result<&CapabilityDefinition, UnknownCapabilityError> {
        self.position(name)
            .map(|i| &self.definitions[i])
            .ok_or_else(|| UnknownCapabilityError::new(name))
    }

    /// Compiled schema for a capability.
    pub fn schema(&self, name: &str) -> Result<&ToolSchema, UnknownCapabilityError> {
        self.position(name)
            .map(|i| &self.schemas[i])
            .ok_or_else(|| UnknownCapabilityError::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Capabilities the caller may run without an explicit user approval.
    pub fn auto_executable(&self) -> Vec<&CapabilityDefinition> {
        self.definitions.iter().filter(|d| d.auto_execute).collect()
    }

    /// Whether a call to `name` needs the user's approval first.
    ///
    /// Unknown names need approval; the dispatcher will reject them anyway.
    pub fn requires_approval(&self, name: &str) -> bool {
        self.lookup(name).map(|d| !d.auto_execute).unwrap_or(true)
    }

    /// Tool specification for every registered capability.
    pub fn tool_specs(&self) -> Vec<Value> {
        self.schemas.iter().map(ToolSchema::to_tool_spec).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }
}
