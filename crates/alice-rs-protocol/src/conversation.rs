//! Conversation transcript types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation.
pub type ConversationId = Uuid;
/// Monotonic identifier for a turn within one conversation.
pub type TurnId = u64;

/// Speaker role for a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored turn.
    User,
    /// Assistant-authored turn.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single utterance in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Position of the turn, starting at 1.
    pub turn_id: TurnId,
    /// Who produced the turn.
    pub role: Role,
    /// Raw utterance text.
    pub text: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Ordered chat transcript. Turns are owned by the conversation and can
/// only be appended, which keeps turn ids strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Optional display title.
    pub title: Option<String>,
    turns: Vec<ConversationTurn>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the latest turn (or creation).
    pub updated_at: DateTime<Utc>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start an empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: None,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Start an empty conversation with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new()
        }
    }

    /// Append a turn stamped with the current time.
    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &ConversationTurn {
        self.push_at(role, text, Utc::now())
    }

    /// Append a turn with an explicit timestamp.
    pub fn push_at(
        &mut self,
        role: Role,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> &ConversationTurn {
        let turn_id = self.last_turn_id().map_or(1, |last| last + 1);
        self.turns.push(ConversationTurn {
            turn_id,
            role,
            text: text.into(),
            timestamp,
        });
        self.updated_at = timestamp;
        &self.turns[self.turns.len() - 1]
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent `max` turns, oldest first.
    pub fn recent(&self, max: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(max);
        &self.turns[start..]
    }

    /// Iterate over turns authored by the given role.
    pub fn turns_by(&self, role: Role) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().filter(move |turn| turn.role == role)
    }

    /// Id of the latest turn, if any.
    pub fn last_turn_id(&self) -> Option<TurnId> {
        self.turns.last().map(|turn| turn.turn_id)
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the conversation has no turns yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn turn_ids_increase_from_one() {
        let mut conversation = Conversation::new();
        conversation.push(Role::User, "hello");
        conversation.push(Role::Assistant, "hi there");
        conversation.push(Role::User, "bye");

        let ids: Vec<TurnId> = conversation.turns().iter().map(|t| t.turn_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(conversation.last_turn_id(), Some(3));
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut conversation = Conversation::with_title("window");
        for idx in 0..15 {
            conversation.push(Role::User, format!("Message {idx}"));
        }

        let recent = conversation.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].text, "Message 5");
        assert_eq!(recent[9].text, "Message 14");
        assert_eq!(conversation.recent(100).len(), 15);
    }

    #[test]
    fn role_serializes_lowercase() {
        let encoded = serde_json::to_string(&Role::Assistant).expect("serialize");
        assert_eq!(encoded, "\"assistant\"");
        let decoded: Role = serde_json::from_str("\"user\"").expect("deserialize");
        assert_eq!(decoded, Role::User);
    }

    #[test]
    fn conversation_round_trips_with_private_turns() {
        let mut conversation = Conversation::new();
        conversation.push(Role::User, "My keys are on the desk");
        let encoded = serde_json::to_string(&conversation).expect("serialize");
        let decoded: Conversation = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, conversation);
    }
}
