//! Persistence collaborators for the memory store.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use crate::policy::MemoryCompactionPolicy;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable storage behind a `MemoryStore`.
///
/// Every call must be durable when it returns `Ok`.
pub trait MemoryProvider: Send + Sync {
    /// Load every live record, used once at store startup.
    fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError>;

    /// Persist an inserted or updated record.
    fn save(&self, record: &MemoryRecord) -> Result<(), MemoryError>;

    /// Persist the removal of a key.
    fn delete(&self, key: &str) -> Result<(), MemoryError>;

    /// Rewrite storage to hold exactly `live` if the policy asks for it.
    /// Returns whether a rewrite happened.
    fn compact(
        &self,
        _live: &[MemoryRecord],
        _policy: &MemoryCompactionPolicy,
    ) -> Result<bool, MemoryError> {
        Ok(false)
    }
}

/// One line of the memory log.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LogEntry<'a> {
    Upsert { record: &'a MemoryRecord },
    Delete { key: &'a str },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StoredEntry {
    Upsert { record: MemoryRecord },
    Delete { key: String },
}

#[derive(Debug, Default)]
struct LogState {
    /// Events currently in the log file.
    entries: usize,
}

/// File-backed provider keeping an append-only JSONL event log.
///
/// Each mutation appends one `upsert` or `delete` line and syncs it before
/// returning. A torn final line left by a crash is discarded on load.
#[derive(Debug)]
pub struct FileMemoryProvider {
    /// Root directory for the memory log.
    root: PathBuf,
    state: Mutex<LogState>,
}

impl FileMemoryProvider {
    /// Name of the log file under the root directory.
    pub const LOG_FILE: &'static str = "memory.jsonl";

    /// Create a new file-backed provider under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file memory provider (root={})", root.display());
        Ok(Self {
            root,
            state: Mutex::new(LogState::default()),
        })
    }

    /// Path to the memory log.
    pub fn log_path(&self) -> PathBuf {
        self.root.join(Self::LOG_FILE)
    }

    /// Path to the temporary file used while compacting.
    fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{}.tmp", Self::LOG_FILE))
    }

    /// Number of events in the log as last observed by this provider.
    pub fn log_entries(&self) -> usize {
        self.state.lock().entries
    }

    /// Append a single event and sync it to disk.
    fn append(&self, entry: &LogEntry<'_>) -> Result<(), MemoryError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let mut state = self.state.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())?;
        file.write_all(&line)?;
        file.sync_data()?;
        state.entries += 1;
        Ok(())
    }

    /// Truncate a torn tail and terminate the last good line.
    fn repair(&self, valid_len: usize, needs_newline: bool) -> Result<(), MemoryError> {
        let mut file = OpenOptions::new().write(true).open(self.log_path())?;
        file.set_len(valid_len as u64)?;
        if needs_newline {
            let mut file = OpenOptions::new().append(true).open(self.log_path())?;
            file.write_all(b"\n")?;
            file.sync_data()?;
        }
        file.sync_all()?;
        Ok(())
    }
}

impl MemoryProvider for FileMemoryProvider {
    fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        let temp_path = self.temp_path();
        if temp_path.exists() {
            warn!(
                "removing leftover compaction file (path={})",
                temp_path.display()
            );
            fs::remove_file(&temp_path)?;
        }

        let path = self.log_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path)?;
        let mut records = BTreeMap::new();
        let mut entries = 0;
        let mut offset = 0;
        let mut valid_len = 0;
        let mut needs_newline = false;

        for (idx, line) in bytes.split_inclusive(|byte| *byte == b'\n').enumerate() {
            offset += line.len();
            let terminated = line.ends_with(b"\n");
            let body = line.trim_ascii();
            if body.is_empty() {
                valid_len = offset;
                continue;
            }
            match serde_json::from_slice::<StoredEntry>(body) {
                Ok(StoredEntry::Upsert { record }) => {
                    records.insert(record.key.clone(), record);
                }
                Ok(StoredEntry::Delete { key }) => {
                    records.remove(&key);
                }
                Err(err) if offset == bytes.len() => {
                    warn!(
                        "discarding torn memory log tail (line={}, error={})",
                        idx + 1,
                        err
                    );
                    break;
                }
                Err(err) => return Err(err.into()),
            }
            entries += 1;
            valid_len = offset;
            needs_newline = !terminated;
        }

        if valid_len < bytes.len() || needs_newline {
            self.repair(valid_len, needs_newline)?;
        }
        self.state.lock().entries = entries;
        debug!(
            "loaded memory log (records={}, entries={})",
            records.len(),
            entries
        );
        Ok(records.into_values().collect())
    }

    fn save(&self, record: &MemoryRecord) -> Result<(), MemoryError> {
        self.append(&LogEntry::Upsert { record })?;
        debug!(
            "stored memory record (key={}, category={}, confidence={:.2})",
            record.key, record.category, record.confidence
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), MemoryError> {
        self.append(&LogEntry::Delete { key })?;
        debug!("deleted memory record (key={})", key);
        Ok(())
    }

    fn compact(
        &self,
        live: &[MemoryRecord],
        policy: &MemoryCompactionPolicy,
    ) -> Result<bool, MemoryError> {
        let mut state = self.state.lock();
        if !policy.should_compact(state.entries, live.len()) {
            return Ok(false);
        }
        let temp_path = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for record in live {
                let line = serde_json::to_string(&LogEntry::Upsert { record })?;
                writeln!(file, "{line}")?;
            }
            file.sync_all()?;
        }
        fs::rename(&temp_path, self.log_path())?;
        sync_dir(&self.root)?;
        info!(
            "memory log compacted (previous_entries={}, entries={})",
            state.entries,
            live.len()
        );
        state.entries = live.len();
        Ok(true)
    }
}

/// Persist a rename by syncing the directory entry.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), MemoryError> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), MemoryError> {
    Ok(())
}
