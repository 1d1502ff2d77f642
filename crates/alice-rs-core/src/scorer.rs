//! Confidence scoring and key normalization for candidate facts.

use crate::detector::{CandidateFact, FactRule};
use crate::error::AliceCoreError;
use crate::hedge::HedgeMatcher;
use alice_rs_config::{ExtractionConfig, ScoringConfig};
use alice_rs_memory::{Category, MemoryRecord, text};
use alice_rs_protocol::{ConversationId, ConversationInsights, TurnId};

/// A candidate with its final key, category, and confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFact {
    pub key: String,
    pub value: String,
    pub category: Category,
    pub confidence: f32,
    pub rule: FactRule,
}

impl ScoredFact {
    /// Build the record to upsert, tagged with its source turn.
    pub fn into_record(self, conversation_id: ConversationId, turn_id: TurnId) -> MemoryRecord {
        MemoryRecord::new(self.key, self.value, self.category, self.confidence)
            .with_source(conversation_id, turn_id)
    }
}

/// Scores candidates: the rule's base score, minus a penalty per hedge,
/// plus a capped boost for each earlier mention of the subject in the
/// conversation. The result is clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct FactScorer {
    config: ScoringConfig,
    hedges: HedgeMatcher,
    min_confidence: f32,
}

impl FactScorer {
    pub fn new(
        config: ScoringConfig,
        hedge_words: &[String],
        min_confidence: f32,
    ) -> Result<Self, AliceCoreError> {
        Ok(Self {
            config,
            hedges: HedgeMatcher::new(hedge_words)?,
            min_confidence,
        })
    }

    pub fn from_config(
        scoring: &ScoringConfig,
        extraction: &ExtractionConfig,
    ) -> Result<Self, AliceCoreError> {
        Self::new(
            scoring.clone(),
            &extraction.hedge_words,
            extraction.min_confidence,
        )
    }

    pub fn score(&self, candidate: &CandidateFact, context: &ConversationInsights) -> ScoredFact {
        let base = self.config.base.get(candidate.rule.kind());
        let hedges = self.hedges.count(&candidate.evidence) as f32;
        let reinforcement = (self.config.reinforcement_boost
            * prior_mentions(&candidate.key, context) as f32)
            .min(self.config.max_reinforcement);
        let confidence = (base - self.config.hedge_penalty * hedges + reinforcement).clamp(0.0, 1.0);
        ScoredFact {
            key: candidate.key.clone(),
            value: candidate.raw_value.clone(),
            category: candidate.category_hint,
            confidence,
            rule: candidate.rule,
        }
    }

    /// Whether a scored fact is confident enough to store.
    pub fn accepts(&self, fact: &ScoredFact) -> bool {
        fact.confidence >= self.min_confidence
    }
}

/// Earlier mentions of every term of the key. The analyzed conversation
/// already contains the current utterance, so one mention is discounted.
fn prior_mentions(key: &str, context: &ConversationInsights) -> usize {
    text::term_set(&key.replace('_', " "))
        .iter()
        .map(|term| context.mentions(term))
        .min()
        .unwrap_or(0)
        .saturating_sub(1)
}
