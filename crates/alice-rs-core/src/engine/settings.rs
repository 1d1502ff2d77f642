//! Config-to-runtime mapping for the memory crate.

use alice_rs_config::{CompactionConfig, RetrievalConfig};
use alice_rs_memory::{MemoryCompactionPolicy, RecallOptions};

/// Translate log compaction config into the runtime policy.
pub(crate) fn compaction_policy_from_config(config: &CompactionConfig) -> MemoryCompactionPolicy {
    MemoryCompactionPolicy {
        enabled: config.enabled,
        max_log_entries: config.max_log_entries,
    }
}

/// Translate retrieval config into recall options.
pub(crate) fn recall_options_from_config(config: &RetrievalConfig) -> RecallOptions {
    RecallOptions {
        top_k: config.top_k,
        min_score: config.min_score,
        half_life_hours: config.half_life_hours,
        min_decay: config.min_decay,
        topic_boost: config.topic_boost,
    }
}

#[cfg(test)]
mod tests {
    use super::{compaction_policy_from_config, recall_options_from_config};
    use alice_rs_config::AliceConfig;
    use alice_rs_memory::{MemoryCompactionPolicy, RecallOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_line_up() {
        let config = AliceConfig::default();
        assert_eq!(
            compaction_policy_from_config(&config.memory.compaction),
            MemoryCompactionPolicy::default()
        );
        assert_eq!(
            recall_options_from_config(&config.retrieval),
            RecallOptions::default()
        );
    }
}
