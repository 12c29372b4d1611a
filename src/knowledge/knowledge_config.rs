//! Options controlling a knowledge-base query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capabilities::DEFAULT_SEARCH_LIMIT;

/// Options passed to [`KnowledgeSearch::search`](super::KnowledgeSearch::search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Maximum number of excerpts to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Return whole notes instead of the matching passage.
    #[serde(default = "default_pass_full_note")]
    pub pass_full_note_into_context: bool,

    /// Only notes modified at or after this instant.
    #[serde(default)]
    pub min_date: Option<DateTime<Utc>>,

    /// Only notes modified at or before this instant.
    #[serde(default)]
    pub max_date: Option<DateTime<Utc>>,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT as usize
}

fn default_pass_full_note() -> bool {
    true
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            pass_full_note_into_context: default_pass_full_note(),
            min_date: None,
            max_date: None,
        }
    }
}

impl SearchOptions {
    pub fn new(limit: usize, pass_full_note_into_context: bool) -> Self {
        Self {
            limit,
            pass_full_note_into_context,
            ..Self::default()
        }
    }

    /// Whether a note modified at `modified` passes the date window.
    /// Notes without a timestamp only pass an open window.
    pub fn admits(&self, modified: Option<DateTime<Utc>>) -> bool {
        if self.min_date.is_none() && self.max_date.is_none() {
            return true;
        }
        let Some(modified) = modified else {
            return false;
        };
        self.min_date.map_or(true, |min| modified >= min)
            && self.max_date.map_or(true, |max| modified <= max)
    }
}
