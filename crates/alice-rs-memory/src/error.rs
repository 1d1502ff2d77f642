//! Error types for memory operations.

/// Errors returned by the memory store and persistence providers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Rejected record (blank key or value, confidence out of range).
    #[error("invalid memory record: {0}")]
    Validation(String),
}
