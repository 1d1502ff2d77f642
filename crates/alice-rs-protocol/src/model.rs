//! Language model collaborator contract.

use crate::conversation::{ConversationTurn, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a language model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend is not loaded or not reachable.
    #[error("model unavailable: {0}")]
    Unavailable(String),
    /// Generation ran but failed.
    #[error("generation failed: {0}")]
    Generation(String),
}

/// Key/value view of a memory handed to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryFact {
    pub key: String,
    pub value: String,
}

impl MemoryFact {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything a model needs to produce the next reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelRequest {
    /// Persona/system instructions.
    pub system_prompt: String,
    /// Recent transcript, oldest first, ending with the current user turn.
    pub history: Vec<ConversationTurn>,
    /// Memories retrieved as relevant to the current utterance.
    pub memories: Vec<MemoryFact>,
    /// Facts extracted and stored from the current utterance.
    pub stored: Vec<MemoryFact>,
}

impl ModelRequest {
    /// Text of the latest user turn in the history.
    pub fn utterance(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.text.as_str())
    }
}

/// Reply generator used by the engine. Implementations may block on
/// inference; callers must not hold store locks across `generate`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable backend name for logs and status output.
    fn name(&self) -> &str;

    /// Generate a reply for the request.
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError>;
}
