//! Error types for the Alice engine.

use alice_rs_config::ConfigError;
use alice_rs_memory::MemoryError;
use alice_rs_protocol::ModelError;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum AliceCoreError {
    /// Memory store or persistence failure, including rejected records.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The language model could not produce a reply.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    /// A detection pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),
    /// Caller input was unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
