use alice_rs_memory::{MemoryError, MemoryProvider, MemoryRecord};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Provider keeping records in a shared map. Clones share state, so a
/// clone can be reopened as a "restarted" store.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    records: Arc<Mutex<BTreeMap<String, MemoryRecord>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<MemoryRecord>) -> Self {
        let provider = Self::new();
        {
            let mut map = provider.records.lock();
            for record in records {
                map.insert(record.key.clone(), record);
            }
        }
        provider
    }

    /// Persisted copy of a record.
    pub fn persisted(&self, key: &str) -> Option<MemoryRecord> {
        self.records.lock().get(key).cloned()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl MemoryProvider for InMemoryProvider {
    fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        Ok(self.records.lock().values().cloned().collect())
    }

    fn save(&self, record: &MemoryRecord) -> Result<(), MemoryError> {
        self.records
            .lock()
            .insert(record.key.clone(), record.clone());
        *self.saves.lock() += 1;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), MemoryError> {
        self.records.lock().remove(key);
        Ok(())
    }
}

/// Provider whose writes always fail.
#[derive(Clone, Default)]
pub struct FailingProvider;

impl FailingProvider {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryProvider for FailingProvider {
    fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        Ok(Vec::new())
    }

    fn save(&self, _record: &MemoryRecord) -> Result<(), MemoryError> {
        Err(std::io::Error::other("disk full").into())
    }

    fn delete(&self, _key: &str) -> Result<(), MemoryError> {
        Err(std::io::Error::other("disk full").into())
    }
}
