//! Result envelope returned for every tool call.
//!
//! A dispatch always produces a [`ResultEnvelope`], success or failure. The
//! envelope is rendered into the conversation transcript as a
//! [`ToolResultPart`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::errors::DispatchError;

/// What a call ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(DispatchError),
}

/// The outcome of one call, tagged with the call it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub call_id: String,
    pub capability_name: String,
    pub outcome: ToolOutcome,
}

impl ResultEnvelope {
    pub fn success(
        call_id: impl Into<String>,
        capability_name: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            capability_name: capability_name.into(),
            outcome: ToolOutcome::Success(payload),
        }
    }

    pub fn failure(
        call_id: impl Into<String>,
        capability_name: impl Into<String>,
        error: DispatchError,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            capability_name: capability_name.into(),
            outcome: ToolOutcome::Failure(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Failure(_))
    }

    /// The error, if the call failed.
    pub fn error(&self) -> Option<&DispatchError> {
        match &self.outcome {
            ToolOutcome::Failure(e) => Some(e),
            ToolOutcome::Success(_) => None,
        }
    }

    /// Success payload, or the rendered error payload.
    pub fn payload(&self) -> Value {
        match &self.outcome {
            ToolOutcome::Success(value) => value.clone(),
            ToolOutcome::Failure(e) => e.to_payload(),
        }
    }

    pub fn to_tool_result_part(&self) -> ToolResultPart {
        ToolResultPart {
            part_type: ToolResultPart::TYPE.to_string(),
            tool_call_id: self.call_id.clone(),
            tool_name: self.capability_name.clone(),
            result: self.payload(),
            is_error: self.is_error(),
        }
    }
}

/// Transcript representation of a result envelope.
///
/// `isError` is only written for failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultPart {
    #[serde(rename = "type")]
    pub part_type: String,
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResultPart {
    pub const TYPE: &'static str = "tool-result";
}

impl From<&ResultEnvelope> for ToolResultPart {
    fn from(envelope: &ResultEnvelope) -> Self {
        envelope.to_tool_result_part()
    }
}
