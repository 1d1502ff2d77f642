//! Persistent fact memory for Alice: records, durable storage, and
//! lexical relevance recall.

pub mod error;
pub mod model;
pub mod policy;
pub mod provider;
pub mod recall;
pub mod store;
pub mod text;

/// Memory error type.
pub use error::MemoryError;
/// Memory record model.
pub use model::{Category, MemoryRecord};
/// Log compaction policy.
pub use policy::MemoryCompactionPolicy;
/// Persistence collaborator interface and default file implementation.
pub use provider::{FileMemoryProvider, MemoryProvider};
/// Relevance ranking over the store.
pub use recall::{RecallOptions, RecallRequest, RelevanceRetriever, ScoredMemory};
/// Shared keyed memory store.
pub use store::{MemoryStore, UpsertOutcome};
