//! Session-level signals: dominant topics, sentiment, themes, counts.

use alice_rs_config::AnalyzerConfig;
use alice_rs_memory::text;
use alice_rs_protocol::{Conversation, ConversationInsights, Role, Sentiment};
use std::collections::{BTreeMap, HashSet};

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "excellent", "excited", "fantastic", "glad", "good", "great", "happy",
    "helpful", "love", "nice", "perfect", "pleased", "thank", "thanks", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "annoyed", "awful", "bad", "broken", "disappointed", "frustrated", "hate",
    "horrible", "lost", "problem", "sad", "stressed", "terrible", "upset", "worried", "wrong",
];

/// Coarse themes and the words that signal them, in reporting order.
const THEMES: &[(&str, &[&str])] = &[
    (
        "work",
        &["boss", "colleague", "deadline", "job", "meeting", "office", "project", "work"],
    ),
    (
        "personal",
        &[
            "anniversary", "birthday", "dad", "family", "friend", "home", "husband", "mom",
            "wife",
        ],
    ),
    (
        "technology",
        &["app", "code", "computer", "internet", "laptop", "phone", "software"],
    ),
    (
        "schedule",
        &[
            "appointment", "calendar", "friday", "meeting", "monday", "saturday", "schedule",
            "sunday", "thursday", "today", "tomorrow", "tuesday", "wednesday",
        ],
    ),
    (
        "location",
        &[
            "counter", "desk", "drawer", "garage", "kitchen", "left", "place", "put", "room",
            "where",
        ],
    ),
    (
        "memory",
        &["forget", "forgot", "memory", "recall", "remember", "remind"],
    ),
];

/// Derives `ConversationInsights` from a conversation. Never fails.
#[derive(Debug, Clone, Default)]
pub struct ConversationAnalyzer {
    config: AnalyzerConfig,
}

impl ConversationAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Topics come from every turn; sentiment, themes, and questions from
    /// user turns only.
    pub fn analyze(&self, conversation: &Conversation) -> ConversationInsights {
        let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
        for turn in conversation.turns() {
            for term in text::content_terms(&turn.text, 1) {
                *term_counts.entry(term).or_default() += 1;
            }
        }

        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut questions_asked = 0usize;
        let mut user_words: HashSet<String> = HashSet::new();
        let mut user_message_count = 0usize;
        for turn in conversation.turns_by(Role::User) {
            user_message_count += 1;
            questions_asked += turn.text.matches('?').count();
            for word in text::tokenize(&turn.text) {
                if POSITIVE_WORDS.contains(&word.as_str()) {
                    positive += 1;
                } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                    negative += 1;
                }
                user_words.insert(word);
            }
        }

        let sentiment = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };
        let themes = THEMES
            .iter()
            .filter(|(_, words)| words.iter().any(|word| user_words.contains(*word)))
            .map(|(theme, _)| theme.to_string())
            .collect();

        ConversationInsights {
            dominant_topics: self.dominant_topics(&term_counts),
            sentiment,
            term_counts,
            themes,
            message_count: conversation.len(),
            user_message_count,
            assistant_message_count: conversation.len() - user_message_count,
            questions_asked,
        }
    }

    /// Most frequent terms long enough to be topics; ties alphabetical.
    fn dominant_topics(&self, term_counts: &BTreeMap<String, usize>) -> Vec<String> {
        let mut ranked: Vec<(&String, usize)> = term_counts
            .iter()
            .filter(|(term, _)| term.chars().count() >= self.config.min_word_len)
            .map(|(term, count)| (term, *count))
            .collect();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
        ranked
            .into_iter()
            .take(self.config.top_topics)
            .map(|(term, _)| term.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ConversationAnalyzer;
    use alice_rs_config::AnalyzerConfig;
    use alice_rs_protocol::{Conversation, Role, Sentiment};
    use pretty_assertions::assert_eq;

    fn conversation(turns: &[(Role, &str)]) -> Conversation {
        let mut conversation = Conversation::new();
        for (role, text) in turns {
            conversation.push(*role, *text);
        }
        conversation
    }

    #[test]
    fn empty_conversation_is_neutral() {
        let insights = ConversationAnalyzer::default().analyze(&Conversation::new());
        assert_eq!(insights.sentiment, Sentiment::Neutral);
        assert!(insights.dominant_topics.is_empty());
        assert_eq!(insights.message_count, 0);
    }

    #[test]
    fn topics_rank_by_frequency() {
        let analyzer = ConversationAnalyzer::new(AnalyzerConfig {
            top_topics: 2,
            min_word_len: 3,
        });
        let insights = analyzer.analyze(&conversation(&[
            (Role::User, "My car keys are on the kitchen counter"),
            (Role::Assistant, "Got it, car keys on the kitchen counter."),
            (Role::User, "Where are my car keys?"),
        ]));
        assert_eq!(insights.dominant_topics, vec!["car", "key"]);
        assert_eq!(insights.mentions("car"), 3);
        assert_eq!(insights.mentions("kitchen"), 2);
        assert_eq!(insights.message_count, 3);
        assert_eq!(insights.user_message_count, 2);
        assert_eq!(insights.assistant_message_count, 1);
        assert_eq!(insights.questions_asked, 1);
        assert!(insights.has_theme("location"));
    }

    #[test]
    fn sentiment_counts_polarity_words() {
        let analyzer = ConversationAnalyzer::default();
        let happy = analyzer.analyze(&conversation(&[(Role::User, "Thanks, that was great!")]));
        assert_eq!(happy.sentiment, Sentiment::Positive);
        let sad = analyzer.analyze(&conversation(&[(
            Role::User,
            "I lost my wallet and I'm worried",
        )]));
        assert_eq!(sad.sentiment, Sentiment::Negative);
        let mixed = analyzer.analyze(&conversation(&[(Role::User, "good news, bad news")]));
        assert_eq!(mixed.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn themes_follow_user_vocabulary() {
        let insights = ConversationAnalyzer::default().analyze(&conversation(&[
            (Role::User, "My meeting with the boss is tomorrow"),
            (Role::User, "Please remember my laptop password hint"),
        ]));
        assert_eq!(
            insights.themes,
            vec!["work", "technology", "schedule", "memory"]
        );
    }
}
