//! The assistant: wiring between detection, storage, recall, and replies.

mod session;
mod settings;

pub use session::{Session, TurnOutcome};

use crate::analyzer::ConversationAnalyzer;
use crate::detector::FactDetector;
use crate::error::AliceCoreError;
use crate::scorer::FactScorer;
use alice_rs_config::AliceConfig;
use alice_rs_memory::{
    Category, FileMemoryProvider, MemoryRecord, MemoryStore, RelevanceRetriever, UpsertOutcome,
    text,
};
use alice_rs_protocol::{
    Conversation, ConversationId, ConversationInsights, LanguageModel, TurnId,
};
use log::{debug, info, warn};
use settings::{compaction_policy_from_config, recall_options_from_config};
use std::sync::Arc;

/// Confidence given to facts the user stores explicitly.
const EXPLICIT_CONFIDENCE: f32 = 1.0;

/// Memory-augmented assistant shared by every session.
pub struct Assistant {
    config: AliceConfig,
    store: Arc<MemoryStore>,
    detector: FactDetector,
    scorer: FactScorer,
    analyzer: ConversationAnalyzer,
    retriever: RelevanceRetriever,
    model: Arc<dyn LanguageModel>,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("model", &self.model.name())
            .field("memories", &self.store.len())
            .finish()
    }
}

impl Assistant {
    /// Build an assistant over an existing store.
    pub fn new(
        config: AliceConfig,
        store: Arc<MemoryStore>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, AliceCoreError> {
        config.validate()?;
        let detector = FactDetector::from_config(&config.extraction)?;
        let scorer = FactScorer::from_config(&config.scoring, &config.extraction)?;
        let analyzer = ConversationAnalyzer::new(config.analyzer.clone());
        let retriever =
            RelevanceRetriever::new(store.clone(), recall_options_from_config(&config.retrieval));
        info!(
            "assistant ready (model={}, rules={}, memories={})",
            model.name(),
            detector.rules().len(),
            store.len()
        );
        Ok(Self {
            config,
            store,
            detector,
            scorer,
            analyzer,
            retriever,
            model,
        })
    }

    /// Open the file-backed store named by the config and build on it.
    pub fn open(
        config: AliceConfig,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, AliceCoreError> {
        config.validate()?;
        let provider = FileMemoryProvider::new(config.memory.resolved_path())?;
        let store = MemoryStore::open(
            Arc::new(provider),
            compaction_policy_from_config(&config.memory.compaction),
        )?;
        Self::new(config, Arc::new(store), model)
    }

    pub fn config(&self) -> &AliceConfig {
        &self.config
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Start a fresh conversation.
    pub fn start_session(self: &Arc<Self>) -> Session {
        Session::new(self.clone(), Conversation::new())
    }

    /// Resume an existing conversation.
    pub fn resume_session(self: &Arc<Self>, conversation: Conversation) -> Session {
        Session::new(self.clone(), conversation)
    }

    /// Store a fact directly, bypassing detection.
    ///
    /// The key is normalized the same way detected subjects are, so
    /// `"my car keys"` and `car_keys` address the same record.
    pub fn store(&self, key: &str, value: &str) -> Result<MemoryRecord, AliceCoreError> {
        let key = text::normalize_key(key).unwrap_or_default();
        let record = MemoryRecord::new(key, value.trim(), Category::Other, EXPLICIT_CONFIDENCE);
        let key = record.key.clone();
        self.store.upsert(record.clone())?;
        Ok(self.store.get(&key).unwrap_or(record))
    }

    /// Current record for a key, if any.
    pub fn lookup(&self, key: &str) -> Option<MemoryRecord> {
        self.store.get(&lookup_key(key))
    }

    /// Remove a record, returning it if it existed.
    pub fn forget(&self, key: &str) -> Result<Option<MemoryRecord>, AliceCoreError> {
        Ok(self.store.remove(&lookup_key(key))?)
    }

    /// Every stored record, ordered by key.
    pub fn memories(&self) -> Vec<MemoryRecord> {
        self.store.scan()
    }

    /// Memories relevant to a free-text query, limited by `retrieval.top_k`.
    pub fn recall(&self, query: &str) -> Vec<MemoryRecord> {
        self.retriever
            .retrieve(query, self.config.retrieval.top_k)
    }

    /// Compact the memory log if due. Call before exiting.
    pub fn shutdown(&self) -> Result<(), AliceCoreError> {
        let compacted = self.store.flush()?;
        info!(
            "assistant shut down (memories={}, compacted={})",
            self.store.len(),
            compacted
        );
        Ok(())
    }

    /// Detect, score, and store facts from one user utterance.
    ///
    /// Returns the stored records and one message per fact that failed to
    /// persist. Failures never abort the turn.
    fn remember(
        &self,
        utterance: &str,
        conversation_id: ConversationId,
        turn_id: TurnId,
        insights: &ConversationInsights,
    ) -> (Vec<MemoryRecord>, Vec<String>) {
        let mut stored = Vec::new();
        let mut warnings = Vec::new();
        for candidate in self.detector.detect(utterance) {
            let fact = self.scorer.score(&candidate, insights);
            if !self.scorer.accepts(&fact) {
                debug!(
                    "skipping low confidence fact (key={}, confidence={:.2})",
                    fact.key, fact.confidence
                );
                continue;
            }
            let key = fact.key.clone();
            let record = fact.into_record(conversation_id, turn_id);
            match self.store.upsert(record.clone()) {
                Ok(outcome) => {
                    if outcome != UpsertOutcome::Unchanged {
                        info!(
                            "remembered fact (key={}, category={}, confidence={:.2})",
                            key, record.category, record.confidence
                        );
                    }
                    stored.push(self.store.get(&key).unwrap_or(record));
                }
                Err(err) => {
                    warn!("failed to store fact (key={}, error={})", key, err);
                    warnings.push(format!("could not remember {key}: {err}"));
                }
            }
        }
        (stored, warnings)
    }
}

/// Normalized form of a user-supplied key, falling back to the raw text.
fn lookup_key(key: &str) -> String {
    text::normalize_key(key).unwrap_or_else(|| key.trim().to_string())
}
