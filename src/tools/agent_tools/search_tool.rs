//! The `search` capability over the knowledge base.

use serde_json::Value;

use super::ToolContext;
use crate::knowledge::SearchOptions;
use crate::tools::structured_tool::ValidatedArgs;
use crate::utilities::errors::{CapabilityError, DispatchError};

/// Semantic search; always asks the backend for whole notes.
pub async fn search(args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let query = args.string("query")?;
    if query.trim().is_empty() {
        return Err(CapabilityError::invalid_argument("query must not be empty").into());
    }

    let limit = args.number("limit")?;
    if limit < 0.0 || limit.fract() != 0.0 || !limit.is_finite() {
        return Err(CapabilityError::invalid_argument(format!(
            "limit must be a non-negative integer, got {}",
            limit
        ))
        .into());
    }

    let options = SearchOptions::new(limit as usize, true);
    let hits = ctx.knowledge.search(query, &options).await?;
    log::debug!("search '{}' returned {} excerpts", query, hits.len());

    serde_json::to_value(hits).map_err(|e| {
        CapabilityError::Internal {
            message: format!("could not encode search results: {}", e),
        }
        .into()
    })
}
