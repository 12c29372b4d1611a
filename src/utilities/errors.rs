//! Error taxonomy for the tool invocation engine.
//!
//! Three kinds of failure can happen while serving a tool call:
//!
//! - [`UnknownCapabilityError`]: the agent named a capability the registry
//!   does not know.
//! - [`ValidationError`]: the arguments do not satisfy the capability's
//!   declared parameter schema (or the schema itself is malformed).
//! - [`CapabilityError`]: an external collaborator (file system, search
//!   backend) reported a failure.
//!
//! All three are folded into [`DispatchError`] and rendered as an error
//! payload inside a result envelope; none of them escapes the dispatcher.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// UnknownCapabilityError
// ---------------------------------------------------------------------------

/// The requested capability name is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Unknown tool: {name}")]
pub struct UnknownCapabilityError {
    /// The name the caller asked for.
    pub name: String,
}

impl UnknownCapabilityError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Argument or schema validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ValidationError {
    /// A parameter without a default was not supplied.
    #[error("Missing required parameter '{parameter}'")]
    MissingRequired { parameter: String },

    /// A supplied value (or a declared default) does not match the
    /// parameter's type.
    #[error("Parameter '{parameter}' expected {expected_type}, got {found}")]
    TypeMismatch {
        parameter: String,
        expected_type: String,
        found: String,
    },

    /// The schema declares a type the validator cannot check. This is a
    /// registry authoring bug rather than bad input.
    #[error("Parameter '{parameter}' declares unsupported type '{declared_type}'")]
    UnsupportedSchemaType {
        parameter: String,
        declared_type: String,
    },

    /// The argument bag is neither a list, an object, nor JSON text holding one.
    #[error("Malformed arguments: {message}")]
    MalformedArguments { message: String },
}

impl ValidationError {
    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::MissingRequired {
            parameter: parameter.into(),
        }
    }

    pub fn mismatch(
        parameter: impl Into<String>,
        expected_type: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            parameter: parameter.into(),
            expected_type: expected_type.into(),
            found: found.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedArguments {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "MissingRequired",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::UnsupportedSchemaType { .. } => "UnsupportedSchemaType",
            Self::MalformedArguments { .. } => "MalformedArguments",
        }
    }
}

// ---------------------------------------------------------------------------
// CapabilityError
// ---------------------------------------------------------------------------

/// Failure reported while a capability talks to its collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum CapabilityError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Path already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The resolved path would leave the vault root.
    #[error("Path '{path}' resolves outside the vault")]
    OutsideVault { path: String },

    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    /// An adapter or collaborator panicked.
    #[error("Internal failure: {message}")]
    Internal { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl CapabilityError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFound",
            Self::AlreadyExists { .. } => "AlreadyExists",
            Self::PermissionDenied { .. } => "PermissionDenied",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::OutsideVault { .. } => "OutsideVault",
            Self::BackendUnavailable { .. } => "BackendUnavailable",
            Self::Timeout { .. } => "Timeout",
            Self::Internal { .. } => "Internal",
            Self::Io { .. } => "Io",
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

/// Any failure a single dispatch can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnknownCapability(#[from] UnknownCapabilityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

impl DispatchError {
    /// Taxonomy name used as the `error` field of the payload.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownCapability(_) => "UnknownCapabilityError",
            Self::Validation(_) => "ValidationError",
            Self::Capability(_) => "CapabilityError",
        }
    }

    /// Error payload placed in a failed result envelope.
    ///
    /// Always an object with `error` (taxonomy), `message` (human readable)
    /// and, for validation and capability failures, `kind` plus the
    /// variant's fields.
    pub fn to_payload(&self) -> Value {
        let details = match self {
            Self::UnknownCapability(e) => serde_json::to_value(e),
            Self::Validation(e) => serde_json::to_value(e),
            Self::Capability(e) => serde_json::to_value(e),
        }
        .unwrap_or(Value::Null);

        let mut payload = json!({
            "error": self.category(),
            "message": self.to_string(),
        });
        if let (Value::Object(out), Value::Object(fields)) = (&mut payload, details) {
            for (key, value) in fields {
                out.entry(key).or_insert(value);
            }
        }
        payload
    }
}

// ---------------------------------------------------------------------------
// RegistryError / ConfigError
// ---------------------------------------------------------------------------

/// Registry authoring defects, reported when the registry or the dispatcher
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Capability '{name}' is registered more than once")]
    DuplicateCapability { name: String },

    #[error("Capability '{capability}' declares parameter '{parameter}' more than once")]
    DuplicateParameter {
        capability: String,
        parameter: String,
    },

    #[error("Capability '{capability}' has an invalid schema: {source}")]
    InvalidSchema {
        capability: String,
        #[source]
        source: ValidationError,
    },

    #[error("Capability '{name}' has no implementation")]
    MissingImplementation { name: String },
}

/// Errors from agent configuration storage and prompt rendering.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Agent config storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Agent config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template variable '{0}' not found in inputs")]
    MissingTemplateVariable(String),
}
