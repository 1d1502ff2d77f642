//! Process-wide keyed memory store.
//!
//! Writers take a per-key lock, persist through the provider, then swap the
//! new record into the map. Readers clone an `Arc` under a short read lock
//! and never see a half-written record.
//!
//! Keys are matched by their folded form (`text::fold_key`), so `car_key`
//! and `car_keys` address one record. A record keeps the spelling it was
//! first stored under.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use crate::policy::MemoryCompactionPolicy;
use crate::provider::MemoryProvider;
use crate::text;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The key was new.
    Inserted,
    /// An existing record changed.
    Updated,
    /// The stored record already held the same fact; nothing was written.
    Unchanged,
}

/// Shared memory store backed by a persistence provider.
pub struct MemoryStore {
    /// Records by folded key.
    records: RwLock<HashMap<String, Arc<MemoryRecord>>>,
    /// Writer locks by folded key, present only while in use.
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Held shared by mutations and exclusively by compaction.
    commit: RwLock<()>,
    provider: Arc<dyn MemoryProvider>,
    compaction: MemoryCompactionPolicy,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.records.read().len())
            .field("compaction", &self.compaction)
            .finish()
    }
}

impl MemoryStore {
    /// Open a store, loading every persisted record from the provider.
    pub fn open(
        provider: Arc<dyn MemoryProvider>,
        compaction: MemoryCompactionPolicy,
    ) -> Result<Self, MemoryError> {
        let mut records: HashMap<String, Arc<MemoryRecord>> = HashMap::new();
        for record in provider.load_all()? {
            if let Err(err) = validate(&record) {
                warn!("skipping persisted memory record (key={:?}, error={})", record.key, err);
                continue;
            }
            let folded = text::fold_key(&record.key);
            if let Some(existing) = records.get(&folded)
                && existing.updated_at > record.updated_at
            {
                warn!(
                    "skipping older persisted spelling (key={}, kept={})",
                    record.key, existing.key
                );
                continue;
            }
            records.insert(folded, Arc::new(record));
        }
        info!("memory store opened (records={})", records.len());
        Ok(Self {
            records: RwLock::new(records),
            key_locks: Mutex::new(HashMap::new()),
            commit: RwLock::new(()),
            provider,
            compaction,
        })
    }

    /// Insert or overwrite a record by key.
    ///
    /// An existing record keeps its key spelling and `created_at`.
    /// Re-applying an identical fact is a no-op. The record is durable before
    /// it becomes visible; if persisting fails the previous version stays in
    /// place.
    pub fn upsert(&self, record: MemoryRecord) -> Result<UpsertOutcome, MemoryError> {
        validate(&record)?;
        let folded = text::fold_key(&record.key);
        self.with_key_lock(&folded, || self.upsert_locked(&folded, record))
    }

    fn upsert_locked(
        &self,
        folded: &str,
        record: MemoryRecord,
    ) -> Result<UpsertOutcome, MemoryError> {
        let existing = self.records.read().get(folded).cloned();
        let (record, outcome) = match existing {
            Some(existing) => {
                let record = MemoryRecord {
                    key: existing.key.clone(),
                    created_at: existing.created_at,
                    ..record
                };
                if existing.same_content(&record) {
                    debug!("memory record unchanged (key={})", record.key);
                    return Ok(UpsertOutcome::Unchanged);
                }
                (record, UpsertOutcome::Updated)
            }
            None => (record, UpsertOutcome::Inserted),
        };

        let _commit = self.commit.read();
        self.provider.save(&record)?;
        debug!(
            "memory record {} (key={}, category={}, confidence={:.2})",
            match outcome {
                UpsertOutcome::Inserted => "inserted",
                _ => "updated",
            },
            record.key,
            record.category,
            record.confidence
        );
        self.records
            .write()
            .insert(folded.to_string(), Arc::new(record));
        Ok(outcome)
    }

    /// Look up a record by key.
    pub fn get(&self, key: &str) -> Option<MemoryRecord> {
        self.records
            .read()
            .get(&text::fold_key(key))
            .map(|record| record.as_ref().clone())
    }

    /// Every record, ordered by key.
    pub fn scan(&self) -> Vec<MemoryRecord> {
        let snapshot: Vec<Arc<MemoryRecord>> = self.records.read().values().cloned().collect();
        let mut records: Vec<MemoryRecord> = snapshot
            .iter()
            .map(|record| record.as_ref().clone())
            .collect();
        records.sort_by(|left, right| left.key.cmp(&right.key));
        records
    }

    /// Remove a record; `Ok(None)` when the key was not stored.
    pub fn remove(&self, key: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        let folded = text::fold_key(key);
        self.with_key_lock(&folded, || {
            let Some(existing) = self.records.read().get(&folded).cloned() else {
                return Ok(None);
            };
            let _commit = self.commit.read();
            self.provider.delete(&existing.key)?;
            let removed = self.records.write().remove(&folded);
            Ok(removed.map(|record| record.as_ref().clone()))
        })
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Let the provider compact its storage. Every mutation is already
    /// durable, so this only reclaims space; call it at shutdown.
    pub fn flush(&self) -> Result<bool, MemoryError> {
        let _commit = self.commit.write();
        let live = self.scan();
        let compacted = self.provider.compact(&live, &self.compaction)?;
        if compacted {
            info!("memory store compacted (records={})", live.len());
        }
        Ok(compacted)
    }

    /// Run `f` holding the writer lock for a folded key. The lock entry is
    /// dropped again once no other writer holds or awaits it.
    fn with_key_lock<T>(&self, folded: &str, f: impl FnOnce() -> T) -> T {
        let lock = self
            .key_locks
            .lock()
            .entry(folded.to_string())
            .or_default()
            .clone();
        let result = {
            let _guard = lock.lock();
            f()
        };
        let mut locks = self.key_locks.lock();
        if locks
            .get(folded)
            .is_some_and(|current| Arc::ptr_eq(current, &lock))
            && Arc::strong_count(&lock) == 2
        {
            locks.remove(folded);
        }
        result
    }

    #[cfg(test)]
    fn tracked_key_locks(&self) -> usize {
        self.key_locks.lock().len()
    }
}

/// Reject records the store must never hold.
fn validate(record: &MemoryRecord) -> Result<(), MemoryError> {
    if record.key.trim().is_empty() {
        return Err(MemoryError::Validation("key must not be blank".to_string()));
    }
    if record.value.trim().is_empty() {
        return Err(MemoryError::Validation(format!(
            "value for `{}` must not be blank",
            record.key
        )));
    }
    if !(record.confidence.is_finite() && (0.0..=1.0).contains(&record.confidence)) {
        return Err(MemoryError::Validation(format!(
            "confidence for `{}` must be within [0, 1] (got {})",
            record.key, record.confidence
        )));
    }
    Ok(())
}
