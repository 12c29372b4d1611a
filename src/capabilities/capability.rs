//! Capability definitions: the declarative signature of one agent tool.
//!
//! A definition is plain data. The parameter `type` is kept as the declared
//! string so the same record can be published verbatim as an LLM tool
//! specification and interpreted by [`ToolSchema`](crate::tools::ToolSchema).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameter types the schema validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ParamType::String),
            "number" => Ok(ParamType::Number),
            "boolean" => Ok(ParamType::Boolean),
            other => Err(other.to_string()),
        }
    }
}

/// One named parameter of a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityParameter {
    /// Parameter name, unique within its capability.
    pub name: String,

    /// Declared type: "string", "number" or "boolean".
    #[serde(rename = "type")]
    pub param_type: String,

    /// Value substituted when the agent omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Human-readable description shown to the model.
    pub description: String,
}

impl CapabilityParameter {
    pub fn new(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.as_str().to_string(),
            default_value: None,
            description: description.into(),
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::String, description)
    }

    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Number, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamType::Boolean, description)
    }

    /// Builder method to set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Whether the parameter must be supplied by the caller.
    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }
}

/// The signature of one capability the agent may invoke.
///
/// Built once into the registry and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDefinition {
    /// Globally unique name, used as the tool name by the model.
    pub name: String,

    /// What the capability does, phrased for the model.
    pub description: String,

    /// Parameters in positional order.
    #[serde(default)]
    pub parameters: Vec<CapabilityParameter>,

    /// Whether the caller may run this capability without asking the user.
    #[serde(default)]
    pub auto_execute: bool,
}

impl CapabilityDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            auto_execute: false,
        }
    }

    /// Builder method to append a parameter.
    pub fn with_parameter(mut self, parameter: CapabilityParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Builder method to set the auto-execute flag.
    pub fn with_auto_execute(mut self, auto_execute: bool) -> Self {
        self.auto_execute = auto_execute;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&CapabilityParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}
