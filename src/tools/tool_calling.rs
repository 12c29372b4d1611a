//! Tool call requests as emitted by the agent.
//!
//! A [`CallRequest`] names a capability, carries the agent's raw argument bag
//! and an opaque call id used to correlate the result envelope. Arguments are
//! kept as received; they are interpreted only when the dispatcher validates
//! them, so a malformed bag still produces a correlated error envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utilities::errors::ValidationError;

/// A single tool invocation requested by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Name of the capability to invoke.
    #[serde(alias = "toolName")]
    pub capability_name: String,

    /// Raw argument bag: a list (positional), an object (named), JSON text
    /// holding either, or null.
    #[serde(default, alias = "args")]
    pub arguments: Value,

    /// Opaque identifier, unique per invocation.
    #[serde(alias = "toolCallId", default = "generate_call_id")]
    pub call_id: String,
}

fn generate_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

impl CallRequest {
    /// Create a request with a freshly generated call id.
    pub fn new(capability_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            capability_name: capability_name.into(),
            arguments,
            call_id: generate_call_id(),
        }
    }

    /// Create a request with positional arguments.
    pub fn positional(capability_name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self::new(capability_name, Value::Array(arguments))
    }

    /// Builder method to set the call id supplied by the model.
    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = call_id.into();
        self
    }

    /// Interpret the raw argument bag.
    pub fn raw_arguments(&self) -> Result<RawArguments, ValidationError> {
        RawArguments::from_value(self.arguments.clone())
    }
}

/// The argument bag in one of its two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArguments {
    /// Values matched to parameters by declaration order.
    Positional(Vec<Value>),
    /// Values matched to parameters by name.
    Named(Map<String, Value>),
}

impl Default for RawArguments {
    fn default() -> Self {
        RawArguments::Positional(Vec::new())
    }
}

impl RawArguments {
    /// Interpret a raw JSON value as an argument bag.
    ///
    /// Arrays are positional, objects are named, `null` is empty and a
    /// string is parsed as JSON once.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => Ok(Self::Positional(items)),
            Value::Object(map) => Ok(Self::Named(map)),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Self::default());
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => Ok(Self::Positional(items)),
                    Ok(Value::Object(map)) => Ok(Self::Named(map)),
                    Ok(Value::Null) => Ok(Self::default()),
                    Ok(_) => Err(ValidationError::malformed(
                        "argument text must encode a JSON array or object",
                    )),
                    Err(e) => Err(ValidationError::malformed(format!(
                        "failed to parse arguments as JSON: {}",
                        e
                    ))),
                }
            }
            other => Err(ValidationError::malformed(format!(
                "arguments must be a list or an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Value supplied for the parameter at `index` named `name`, if any.
    ///
    /// JSON `null` counts as not supplied.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        let value = match self {
            Self::Positional(items) => items.get(index),
            Self::Named(map) => map.get(name),
        };
        value.filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Positional(items) => items.len(),
            Self::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
