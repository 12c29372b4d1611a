//! Knowledge-base search contract.
//!
//! The vector-similarity backend lives outside the engine. Capabilities
//! reach it through [`KnowledgeSearch`], which returns ranked excerpts of
//! the user's notes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::knowledge_config::SearchOptions;
use crate::utilities::errors::{CapabilityError, DispatchError};

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeExcerpt {
    /// Path of the note the excerpt comes from.
    pub note_path: String,
    /// The matching passage, or the whole note when requested.
    pub content: String,
    /// Relevance, higher is better.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

/// Failure reported by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Search timed out after {0}ms")]
    Timeout(u64),
}

impl From<SearchError> for CapabilityError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::Unavailable(message) => CapabilityError::BackendUnavailable { message },
            SearchError::InvalidQuery(message) => CapabilityError::InvalidArgument { message },
            SearchError::Timeout(ms) => CapabilityError::Timeout {
                operation: format!("knowledge search ({}ms)", ms),
            },
        }
    }
}

impl From<SearchError> for DispatchError {
    fn from(error: SearchError) -> Self {
        DispatchError::Capability(error.into())
    }
}

/// Semantic search over the user's knowledge base.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Return at most `options.limit` excerpts, best first.
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<KnowledgeExcerpt>, SearchError>;
}
