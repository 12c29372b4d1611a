//! Schema validator for capability arguments.
//!
//! [`ToolSchema`] is built once from a [`CapabilityDefinition`] and then
//! interprets untrusted argument bags against it, producing a typed
//! [`ValidatedArgs`] record. The same object renders the JSON tool
//! specification sent upstream to the model, so the published contract and
//! the enforced one cannot drift apart.

use std::fmt;

use serde_json::{json, Map, Value};

use super::tool_calling::{json_type_name, RawArguments};
use crate::capabilities::capability::{CapabilityDefinition, ParamType};
use crate::utilities::errors::ValidationError;

// ---------------------------------------------------------------------------
// ParamValue
// ---------------------------------------------------------------------------

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A validated argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::String(_) => ParamType::String,
            ParamValue::Number(_) => ParamType::Number,
            ParamValue::Boolean(_) => ParamType::Boolean,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::String(s) => Value::String(s.clone()),
            // Whole numbers render as JSON integers (`20`, not `20.0`).
            ParamValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Value::from(*n as i64)
            }
            ParamValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ParamValue::Boolean(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

// ---------------------------------------------------------------------------
// ToolSchema
// ---------------------------------------------------------------------------

/// A compiled parameter: declared type resolved, default checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub default: Option<ParamValue>,
    pub description: String,
}

/// Runtime validator for one capability's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
}

impl ToolSchema {
    /// Compile a definition into a validator.
    ///
    /// Fails with `UnsupportedSchemaType` when a parameter declares a type
    /// outside string/number/boolean, and with `TypeMismatch` when a
    /// declared default does not satisfy its own type.
    pub fn build(definition: &CapabilityDefinition) -> Result<Self, ValidationError> {
        let mut params = Vec::with_capacity(definition.parameters.len());

        for parameter in &definition.parameters {
            let param_type: ParamType = parameter.param_type.parse().map_err(|declared| {
                ValidationError::UnsupportedSchemaType {
                    parameter: parameter.name.clone(),
                    declared_type: declared,
                }
            })?;

            let default = match &parameter.default_value {
                Some(value) if !value.is_null() => {
                    Some(check_strict(&parameter.name, param_type, value)?)
                }
                _ => None,
            };

            params.push(ParamSpec {
                name: parameter.name.clone(),
                param_type,
                default,
                description: parameter.description.clone(),
            });
        }

        Ok(Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            params,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Validate and coerce an argument bag.
    ///
    /// Parameters are visited in declaration order. Positional bags match by
    /// index, named bags by parameter name. Values the schema does not
    /// mention are ignored.
    pub fn validate(&self, args: &RawArguments) -> Result<ValidatedArgs, ValidationError> {
        let mut values = Vec::with_capacity(self.params.len());

        for (index, spec) in self.params.iter().enumerate() {
            let value = match args.get(index, &spec.name) {
                Some(raw) => coerce(spec, raw)?,
                None => match &spec.default {
                    Some(default) => default.clone(),
                    None => return Err(ValidationError::missing(&spec.name)),
                },
            };
            values.push((spec.name.clone(), value));
        }

        let ignored = self.ignored_arguments(args);
        if !ignored.is_empty() {
            log::debug!(
                "Ignoring {} unexpected argument(s) for '{}': {}",
                ignored.len(),
                self.name,
                ignored.join(", ")
            );
        }

        Ok(ValidatedArgs {
            capability: self.name.clone(),
            values,
        })
    }

    fn ignored_arguments(&self, args: &RawArguments) -> Vec<String> {
        match args {
            RawArguments::Positional(items) => (self.params.len()..items.len())
                .map(|i| format!("#{}", i))
                .collect(),
            RawArguments::Named(map) => map
                .keys()
                .filter(|key| !self.params.iter().any(|p| &p.name == *key))
                .cloned()
                .collect(),
        }
    }

    /// JSON Schema object describing the parameters.
    pub fn parameters_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for spec in &self.params {
            let mut property = Map::new();
            property.insert("type".into(), json!(spec.param_type.as_str()));
            property.insert("description".into(), json!(spec.description));
            match &spec.default {
                Some(default) => {
                    property.insert("default".into(), default.to_json());
                }
                None => required.push(Value::String(spec.name.clone())),
            }
            properties.insert(spec.name.clone(), Value::Object(property));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Tool specification in the function-calling format LLM APIs accept.
    pub fn to_tool_spec(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_json_schema(),
            }
        })
    }
}

/// Type check without coercion, used for declared defaults.
fn check_strict(
    parameter: &str,
    param_type: ParamType,
    value: &Value,
) -> Result<ParamValue, ValidationError> {
    let checked = match (param_type, value) {
        (ParamType::String, Value::String(s)) => Some(ParamValue::String(s.clone())),
        (ParamType::Number, Value::Number(n)) => n.as_f64().map(ParamValue::Number),
        (ParamType::Boolean, Value::Bool(b)) => Some(ParamValue::Boolean(*b)),
        _ => None,
    };
    checked.ok_or_else(|| {
        ValidationError::mismatch(parameter, param_type.as_str(), json_type_name(value))
    })
}

/// Type check with the lenient coercions agents need: numeric strings for
/// numbers and "true"/"false" for booleans.
fn coerce(spec: &ParamSpec, value: &Value) -> Result<ParamValue, ValidationError> {
    if let Ok(checked) = check_strict(&spec.name, spec.param_type, value) {
        return Ok(checked);
    }

    let coerced = match (spec.param_type, value) {
        (ParamType::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ParamValue::Number),
        (ParamType::Boolean, Value::String(s)) => match s.trim() {
            "true" => Some(ParamValue::Boolean(true)),
            "false" => Some(ParamValue::Boolean(false)),
            _ => None,
        },
        _ => None,
    };

    coerced.ok_or_else(|| {
        ValidationError::mismatch(&spec.name, spec.param_type.as_str(), json_type_name(value))
    })
}

// ---------------------------------------------------------------------------
// ValidatedArgs
// ---------------------------------------------------------------------------

/// Arguments that passed validation, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs {
    capability: String,
    values: Vec<(String, ParamValue)>,
}

impl ValidatedArgs {
    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn values(&self) -> &[(String, ParamValue)] {
        &self.values
    }

    pub fn string(&self, name: &str) -> Result<&str, ValidationError> {
        match self.get(name) {
            Some(ParamValue::String(s)) => Ok(s),
            Some(other) => Err(ValidationError::mismatch(
                name,
                "string",
                other.param_type().as_str(),
            )),
            None => Err(ValidationError::missing(name)),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64, ValidationError> {
        match self.get(name) {
            Some(ParamValue::Number(n)) => Ok(*n),
            Some(other) => Err(ValidationError::mismatch(
                name,
                "number",
                other.param_type().as_str(),
            )),
            None => Err(ValidationError::missing(name)),
        }
    }

    /// The record as a JSON object, for logging.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}
