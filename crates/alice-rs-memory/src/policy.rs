//! Memory log compaction policy.

/// Policy for rewriting the append-only memory log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCompactionPolicy {
    /// Enable compaction.
    pub enabled: bool,
    /// Log events tolerated before the log is rewritten.
    pub max_log_entries: usize,
}

impl Default for MemoryCompactionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_log_entries: 512,
        }
    }
}

impl MemoryCompactionPolicy {
    /// Whether a log holding `entries` events should be rewritten.
    pub fn should_compact(&self, entries: usize, live_records: usize) -> bool {
        self.enabled && entries > self.max_log_entries && entries > live_records
    }
}
