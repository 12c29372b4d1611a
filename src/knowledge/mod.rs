//! Knowledge-base search.
//!
//! - [`KnowledgeSearch`]: the contract of the external vector-search backend
//! - [`SearchOptions`]: limit, full-note flag and date window of a query
//! - [`InMemoryKnowledgeStore`]: a term-overlap store for tests and offline use

pub mod in_memory;
pub mod knowledge_config;
pub mod storage;

pub use self::in_memory::InMemoryKnowledgeStore;
pub use self::knowledge_config::SearchOptions;
pub use self::storage::{KnowledgeExcerpt, KnowledgeSearch, SearchError};
