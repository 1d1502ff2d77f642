//! Memory record model shared by the store, providers, and recall.

use alice_rs_protocol::{ConversationId, TurnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of fact a record holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Location,
    Date,
    Personal,
    Schedule,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Location => "location",
            Category::Date => "date",
            Category::Personal => "personal",
            Category::Schedule => "schedule",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted fact, unique by `key` within a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Normalized subject label, e.g. `car_keys`.
    pub key: String,
    /// Free-text content of the fact.
    pub value: String,
    pub category: Category,
    /// Certainty in `[0, 1]`.
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Turn that produced the fact, if it came from conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_turn_id: Option<TurnId>,
    /// Conversation holding `source_turn_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_conversation_id: Option<ConversationId>,
}

impl MemoryRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        category: Category,
        confidence: f32,
    ) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            value: value.into(),
            category,
            confidence,
            created_at: now,
            updated_at: now,
            source_turn_id: None,
            source_conversation_id: None,
        }
    }

    /// Attach the conversation turn the fact was extracted from.
    pub fn with_source(mut self, conversation_id: ConversationId, turn_id: TurnId) -> Self {
        self.source_conversation_id = Some(conversation_id);
        self.source_turn_id = Some(turn_id);
        self
    }

    /// Override both timestamps.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.created_at = timestamp;
        self.updated_at = timestamp;
        self
    }

    /// Whether two records carry the same fact, ignoring timestamps and provenance.
    pub fn same_content(&self, other: &MemoryRecord) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.category == other.category
            && self.confidence == other.confidence
    }

    /// Key rendered with spaces, e.g. `car keys`.
    pub fn subject(&self) -> String {
        self.key.replace('_', " ")
    }
}
