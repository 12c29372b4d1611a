//! In-memory knowledge store with term-overlap ranking.
//!
//! Useful for tests and for running the engine without a vector backend.
//! Scoring is the fraction of distinct query terms a passage contains.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::knowledge_config::SearchOptions;
use super::storage::{KnowledgeExcerpt, KnowledgeSearch, SearchError};

#[derive(Debug, Clone)]
struct StoredNote {
    path: String,
    content: String,
    modified: Option<DateTime<Utc>>,
}

/// Knowledge store kept entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryKnowledgeStore {
    notes: Arc<RwLock<Vec<StoredNote>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self {
            notes: Arc::new(RwLock::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Index a note, replacing any previous note at the same path.
    pub fn add_note(
        &self,
        path: impl Into<String>,
        content: impl Into<String>,
        modified: Option<DateTime<Utc>>,
    ) {
        let note = StoredNote {
            path: path.into(),
            content: content.into(),
            modified,
        };
        let mut notes = self.notes.write();
        notes.retain(|n| n.path != note.path);
        notes.push(note);
    }

    pub fn remove_note(&self, path: &str) {
        self.notes.write().retain(|n| n.path != path);
    }

    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn overlap(query_terms: &HashSet<String>, text: &str) -> f64 {
    let text_terms = terms(text);
    let hits = query_terms.iter().filter(|t| text_terms.contains(*t)).count();
    hits as f64 / query_terms.len() as f64
}

/// Best-scoring paragraph of a note.
fn best_passage(query_terms: &HashSet<String>, content: &str) -> String {
    content
        .split("\n\n")
        .map(|p| (overlap(query_terms, p), p))
        .fold((0.0, ""), |best, cur| if cur.0 > best.0 { cur } else { best })
        .1
        .trim()
        .to_string()
}

#[async_trait]
impl KnowledgeSearch for InMemoryKnowledgeStore {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<KnowledgeExcerpt>, SearchError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(SearchError::Unavailable("in-memory index is offline".into()));
        }

        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Err(SearchError::InvalidQuery("query has no searchable terms".into()));
        }

        let notes = self.notes.read();
        let mut hits: Vec<KnowledgeExcerpt> = notes
            .iter()
            .filter(|n| options.admits(n.modified))
            .filter_map(|n| {
                let score = overlap(&query_terms, &n.content);
                if score <= 0.0 {
                    return None;
                }
                let content = if options.pass_full_note_into_context {
                    n.content.clone()
                } else {
                    best_passage(&query_terms, &n.content)
                };
                Some(KnowledgeExcerpt {
                    note_path: n.path.clone(),
                    content,
                    score,
                    modified: n.modified,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.note_path.cmp(&b.note_path))
        });
        hits.truncate(options.limit);
        Ok(hits)
    }
}
