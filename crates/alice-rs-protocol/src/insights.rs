//! Session-level signals derived from a conversation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse polarity of the user's messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Return the sentiment as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// Output of conversation analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConversationInsights {
    /// Most frequent content words, most frequent first, without duplicates.
    pub dominant_topics: Vec<String>,
    /// Lexicon-based sentiment of user turns.
    pub sentiment: Sentiment,
    /// Content-word frequencies across all turns (stemmed).
    pub term_counts: BTreeMap<String, usize>,
    /// Coarse themes such as `location` or `schedule`.
    pub themes: Vec<String>,
    /// Total number of turns.
    pub message_count: usize,
    /// Number of user turns.
    pub user_message_count: usize,
    /// Number of assistant turns.
    pub assistant_message_count: usize,
    /// Count of `?` across user turns.
    pub questions_asked: usize,
}

impl ConversationInsights {
    /// How often a stemmed term occurred in the conversation.
    pub fn mentions(&self, term: &str) -> usize {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Whether a stemmed term is among the dominant topics.
    pub fn is_topic(&self, term: &str) -> bool {
        self.dominant_topics.iter().any(|topic| topic == term)
    }

    /// Whether the conversation touched the given theme.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|existing| existing == theme)
    }
}
