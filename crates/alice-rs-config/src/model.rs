//! Configuration schema for Alice.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root config for the Alice assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AliceConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AliceConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> AliceConfigBuilder {
        AliceConfigBuilder::new()
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.extraction.rules {
            if !seen.insert(*rule) {
                return Err(ConfigError::Invalid(format!(
                    "extraction.rules lists `{}` more than once",
                    rule.as_str()
                )));
            }
        }
        ensure_unit("extraction.min_confidence", self.extraction.min_confidence)?;

        let base = &self.scoring.base;
        for kind in FactRuleKind::ALL {
            ensure_unit(&format!("scoring.base.{}", kind.as_str()), base.get(kind))?;
        }
        ensure_unit("scoring.hedge_penalty", self.scoring.hedge_penalty)?;
        ensure_unit("scoring.reinforcement_boost", self.scoring.reinforcement_boost)?;
        ensure_unit("scoring.max_reinforcement", self.scoring.max_reinforcement)?;

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        ensure_unit("retrieval.min_score", self.retrieval.min_score)?;
        ensure_unit("retrieval.min_decay", self.retrieval.min_decay)?;
        if !(self.retrieval.half_life_hours.is_finite() && self.retrieval.half_life_hours > 0.0) {
            return Err(ConfigError::Invalid(
                "retrieval.half_life_hours must be positive".to_string(),
            ));
        }
        if !(self.retrieval.topic_boost.is_finite() && self.retrieval.topic_boost >= 0.0) {
            return Err(ConfigError::Invalid(
                "retrieval.topic_boost must not be negative".to_string(),
            ));
        }

        if self.conversation.context_window == 0 {
            return Err(ConfigError::Invalid(
                "conversation.context_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn ensure_unit(path: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{path} must be within [0, 1] (got {value})"
        )))
    }
}

/// Builder for assembling an `AliceConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct AliceConfigBuilder {
    config: AliceConfig,
}

impl AliceConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: AliceConfig::default(),
        }
    }

    /// Replace the memory store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Point the memory store at a directory.
    pub fn memory_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.memory.path = Some(path.into().to_string_lossy().to_string());
        self
    }

    /// Replace the fact extraction configuration.
    pub fn extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.config.extraction = extraction;
        self
    }

    /// Replace the confidence scoring configuration.
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Replace the retrieval configuration.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Replace the conversation analyzer configuration.
    pub fn analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.config.analyzer = analyzer;
        self
    }

    /// Replace the conversation configuration.
    pub fn conversation(mut self, conversation: ConversationConfig) -> Self {
        self.config.conversation = conversation;
        self
    }

    /// Finalize and return the built `AliceConfig`.
    pub fn build(self) -> AliceConfig {
        self.config
    }
}

/// Memory store location and log maintenance.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MemoryConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub compaction: CompactionConfig,
}

impl MemoryConfig {
    /// Directory holding the memory log, falling back to `.alice/memory`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".alice").join("memory"))
    }
}

/// When to rewrite the append-only memory log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompactionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_log_entries: default_max_log_entries(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Default number of log events tolerated before compaction.
fn default_max_log_entries() -> usize {
    512
}

/// Fact pattern families, in the order they are tried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FactRuleKind {
    Date,
    Schedule,
    Location,
    Personal,
    Preference,
    Reminder,
}

impl FactRuleKind {
    /// Every rule in default priority order.
    pub const ALL: [FactRuleKind; 6] = [
        FactRuleKind::Date,
        FactRuleKind::Schedule,
        FactRuleKind::Location,
        FactRuleKind::Personal,
        FactRuleKind::Preference,
        FactRuleKind::Reminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactRuleKind::Date => "date",
            FactRuleKind::Schedule => "schedule",
            FactRuleKind::Location => "location",
            FactRuleKind::Personal => "personal",
            FactRuleKind::Preference => "preference",
            FactRuleKind::Reminder => "reminder",
        }
    }
}

/// Fact detection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<FactRuleKind>,
    #[serde(default = "default_hedge_words")]
    pub hedge_words: Vec<String>,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            hedge_words: default_hedge_words(),
            min_confidence: default_min_confidence(),
        }
    }
}

fn default_rules() -> Vec<FactRuleKind> {
    FactRuleKind::ALL.to_vec()
}

/// Phrases that mark a statement as uncertain.
fn default_hedge_words() -> Vec<String> {
    [
        "maybe",
        "perhaps",
        "probably",
        "possibly",
        "might",
        "i think",
        "i guess",
        "i believe",
        "not sure",
        "kind of",
        "sort of",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Scored facts below this confidence are dropped.
fn default_min_confidence() -> f32 {
    0.2
}

/// Confidence model weights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub base: BaseScores,
    #[serde(default = "default_hedge_penalty")]
    pub hedge_penalty: f32,
    #[serde(default = "default_reinforcement_boost")]
    pub reinforcement_boost: f32,
    #[serde(default = "default_max_reinforcement")]
    pub max_reinforcement: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: BaseScores::default(),
            hedge_penalty: default_hedge_penalty(),
            reinforcement_boost: default_reinforcement_boost(),
            max_reinforcement: default_max_reinforcement(),
        }
    }
}

fn default_hedge_penalty() -> f32 {
    0.2
}

fn default_reinforcement_boost() -> f32 {
    0.05
}

fn default_max_reinforcement() -> f32 {
    0.15
}

/// Starting confidence for each rule family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseScores {
    #[serde(default = "default_base_location")]
    pub location: f32,
    #[serde(default = "default_base_date")]
    pub date: f32,
    #[serde(default = "default_base_schedule")]
    pub schedule: f32,
    #[serde(default = "default_base_personal")]
    pub personal: f32,
    #[serde(default = "default_base_preference")]
    pub preference: f32,
    #[serde(default = "default_base_reminder")]
    pub reminder: f32,
}

impl BaseScores {
    /// Base score for a rule family.
    pub fn get(&self, kind: FactRuleKind) -> f32 {
        match kind {
            FactRuleKind::Date => self.date,
            FactRuleKind::Schedule => self.schedule,
            FactRuleKind::Location => self.location,
            FactRuleKind::Personal => self.personal,
            FactRuleKind::Preference => self.preference,
            FactRuleKind::Reminder => self.reminder,
        }
    }
}

impl Default for BaseScores {
    fn default() -> Self {
        Self {
            location: default_base_location(),
            date: default_base_date(),
            schedule: default_base_schedule(),
            personal: default_base_personal(),
            preference: default_base_preference(),
            reminder: default_base_reminder(),
        }
    }
}

fn default_base_location() -> f32 {
    0.9
}

fn default_base_date() -> f32 {
    0.95
}

fn default_base_schedule() -> f32 {
    0.85
}

fn default_base_personal() -> f32 {
    0.8
}

fn default_base_preference() -> f32 {
    0.7
}

fn default_base_reminder() -> f32 {
    0.6
}

/// Relevance ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    #[serde(default = "default_half_life_hours")]
    pub half_life_hours: f64,
    #[serde(default = "default_min_decay")]
    pub min_decay: f32,
    #[serde(default = "default_topic_boost")]
    pub topic_boost: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
            half_life_hours: default_half_life_hours(),
            min_decay: default_min_decay(),
            topic_boost: default_topic_boost(),
        }
    }
}

/// Default number of memories injected per turn.
fn default_top_k() -> usize {
    3
}

fn default_min_score() -> f32 {
    0.15
}

/// Thirty days.
fn default_half_life_hours() -> f64 {
    720.0
}

fn default_min_decay() -> f32 {
    0.1
}

fn default_topic_boost() -> f32 {
    0.1
}

/// Conversation analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    #[serde(default = "default_top_topics")]
    pub top_topics: usize,
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_topics: default_top_topics(),
            min_word_len: default_min_word_len(),
        }
    }
}

fn default_top_topics() -> usize {
    5
}

fn default_min_word_len() -> usize {
    3
}

/// Prompting and reply presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationConfig {
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_true")]
    pub enhance_replies: bool,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            system_prompt: default_system_prompt(),
            enhance_replies: true,
        }
    }
}

/// Number of recent turns sent to the model.
fn default_context_window() -> usize {
    10
}

fn default_system_prompt() -> String {
    "You are Alice, an AI assistant with excellent memory. You remember what users tell you \
     and recall it when needed, such as where they put things, important dates, and \
     personal details."
        .to_string()
}
