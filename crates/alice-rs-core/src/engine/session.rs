//! Per-conversation turn processing.

use super::Assistant;
use crate::compose;
use crate::error::AliceCoreError;
use alice_rs_memory::{MemoryRecord, RecallRequest};
use alice_rs_protocol::{Conversation, ConversationId, ConversationInsights, ModelRequest, Role};
use log::{debug, info};
use std::sync::Arc;

/// Result of one processed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Final reply, after enhancement.
    pub reply_text: String,
    /// Memories recalled and handed to the model.
    pub memories_used: Vec<MemoryRecord>,
    /// Facts detected in the utterance and now in the store.
    pub facts_stored: Vec<MemoryRecord>,
    /// Facts that were detected but could not be persisted.
    pub memory_warnings: Vec<String>,
}

/// One conversation with the assistant.
///
/// Sessions own their conversation; the memory store is shared across
/// every session of the same assistant.
#[derive(Debug)]
pub struct Session {
    assistant: Arc<Assistant>,
    conversation: Conversation,
}

impl Session {
    pub(super) fn new(assistant: Arc<Assistant>, conversation: Conversation) -> Self {
        debug!("session started (conversation_id={})", conversation.id);
        Self {
            assistant,
            conversation,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.conversation.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }

    /// Insights for the conversation so far.
    pub fn insights(&self) -> ConversationInsights {
        self.assistant.analyzer.analyze(&self.conversation)
    }

    /// Process a user utterance and produce the assistant reply.
    ///
    /// Facts in the utterance are stored before recall runs, and are not
    /// recalled back into the same turn. Storage failures are reported in
    /// the outcome; only model failures abort the turn, in which case the
    /// user turn stays in the conversation without a reply.
    pub async fn process_turn(&mut self, utterance: &str) -> Result<TurnOutcome, AliceCoreError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AliceCoreError::InvalidInput(
                "utterance must not be empty".to_string(),
            ));
        }
        let assistant = self.assistant.clone();
        let config = &assistant.config;

        let turn_id = self.conversation.push(Role::User, utterance).turn_id;
        let insights = assistant.analyzer.analyze(&self.conversation);
        let (facts_stored, memory_warnings) =
            assistant.remember(utterance, self.conversation.id, turn_id, &insights);

        let stored_keys: Vec<String> = facts_stored.iter().map(|record| record.key.clone()).collect();
        let request = RecallRequest::new(utterance, config.retrieval.top_k)
            .with_insights(&insights)
            .excluding(&stored_keys);
        let memories_used: Vec<MemoryRecord> = assistant
            .retriever
            .recall(&request)
            .into_iter()
            .map(|scored| scored.record)
            .collect();

        let model_request = ModelRequest {
            system_prompt: compose::system_prompt(
                &config.conversation.system_prompt,
                &memories_used,
            ),
            history: self
                .conversation
                .recent(config.conversation.context_window)
                .to_vec(),
            memories: compose::facts(&memories_used),
            stored: compose::facts(&facts_stored),
        };
        let reply = assistant.model.generate(&model_request).await?;
        let reply_text = if config.conversation.enhance_replies {
            compose::enhance_reply(&reply, &memories_used, &insights)
        } else {
            reply.trim().to_string()
        };
        self.conversation.push(Role::Assistant, reply_text.clone());

        info!(
            "turn processed (conversation_id={}, turn_id={}, stored={}, recalled={}, warnings={})",
            self.conversation.id,
            turn_id,
            facts_stored.len(),
            memories_used.len(),
            memory_warnings.len()
        );
        Ok(TurnOutcome {
            reply_text,
            memories_used,
            facts_stored,
            memory_warnings,
        })
    }
}
