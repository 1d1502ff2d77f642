//! Offline reply generator that answers from memory without inference.

use alice_rs_protocol::{LanguageModel, MemoryFact, ModelError, ModelRequest};
use async_trait::async_trait;

/// Acknowledges stored facts and answers from recalled memories.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryEchoModel;

impl MemoryEchoModel {
    pub fn new() -> Self {
        Self
    }
}

fn describe(facts: &[MemoryFact]) -> String {
    facts
        .iter()
        .map(|fact| format!("{}: {}", fact.key.replace('_', " "), fact.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl LanguageModel for MemoryEchoModel {
    fn name(&self) -> &str {
        "memory-echo"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        if !request.memories.is_empty() {
            return Ok(format!(
                "From what you've told me, {}.",
                describe(&request.memories)
            ));
        }
        if !request.stored.is_empty() {
            return Ok(format!("Got it. I'll remember {}.", describe(&request.stored)));
        }
        Ok("I don't have anything stored about that yet. Tell me where you keep things or \
            about dates that matter and I'll remember them."
            .to_string())
    }
}
