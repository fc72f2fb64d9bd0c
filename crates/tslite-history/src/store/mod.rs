//! Store - the bounded, persisted history log
//!
//! The store is the only owner of its log and the only writer of its storage
//! key. Every mutation is one unit of work: change the in-memory log, then
//! write the whole log back. Persistence failures are logged and swallowed;
//! losing history must never block classification.


use crate::clipboard::{Clipboard, CopyOutcome};
use crate::entry::{HistoryEntry, HistoryLog};
use crate::export::{self, ExportFormat};
use crate::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tslite_client::ClassificationRequest;

/// Maximum number of entries kept
pub const DEFAULT_CAPACITY: usize = 200;

/// Storage key holding the serialized log
pub const DEFAULT_STORAGE_KEY: &str = "tslite.history";

/// History store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Storage key
    #[serde(default = "default_key")]
    pub key: String,
    /// Maximum number of entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            capacity: default_capacity(),
        }
    }
}

type Observer = Box<dyn Fn(&HistoryLog) + Send + Sync>;

/// Bounded, persisted log of successful classifications
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    config: HistoryConfig,
    log: HistoryLog,
    observers: Vec<Observer>,
}

impl HistoryStore {
    /// Open the store, loading whatever is persisted
    pub fn open(storage: Arc<dyn KeyValueStorage>, config: HistoryConfig) -> Self {
        let mut store = Self {
            storage,
            config: HistoryConfig {
                capacity: config.capacity.max(1),
                ..config
            },
            log: HistoryLog::new(),
            observers: Vec::new(),
        };
        store.log = store.load();
        info!(
            key = %store.config.key,
            entries = store.log.len(),
            "History loaded"
        );
        store
    }

    /// Read the persisted log
    ///
    /// Never fails: missing or corrupt data yields an empty log. A log longer
    /// than the capacity is cut down to it.
    #[instrument(skip(self), fields(key = %self.config.key))]
    pub fn load(&self) -> HistoryLog {
        let text = match self.storage.get(&self.config.key) {
            Ok(Some(text)) => text,
            Ok(None) => return HistoryLog::new(),
            Err(e) => {
                warn!(error = %e, "History storage unreadable, starting empty");
                return HistoryLog::new();
            }
        };

        match serde_json::from_str::<HistoryLog>(&text) {
            Ok(mut log) => {
                let dropped = log.truncate(self.config.capacity);
                if dropped > 0 {
                    debug!(dropped, "Persisted history exceeded capacity");
                }
                log
            }
            Err(e) => {
                warn!(error = %e, "History storage corrupt, starting empty");
                HistoryLog::new()
            }
        }
    }

    /// Prepend an entry, evict beyond capacity, persist and notify
    #[instrument(skip(self, entry), fields(timestamp = entry.timestamp))]
    pub fn record(&mut self, entry: HistoryEntry) {
        let evicted = self.log.push_front(entry, self.config.capacity);
        if evicted > 0 {
            debug!(evicted, "Evicted oldest history entries");
        }
        self.persist();
        self.notify();
    }

    /// Remove every entry, persist and notify
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.log.clear();
        self.persist();
        self.notify();
    }

    /// Register an observer called after every mutation
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&HistoryLog) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// The in-memory log
    #[must_use]
    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    /// Entries, newest first
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        self.log.entries()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Entry at `index` (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.log.get(index)
    }

    /// The request of entry `index`, ready to be submitted again
    #[must_use]
    pub fn replay_request(&self, index: usize) -> Option<ClassificationRequest> {
        self.get(index).map(|entry| entry.request.clone())
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Encode one entry for download
    #[must_use]
    pub fn export_entry(&self, entry: &HistoryEntry, format: ExportFormat) -> Vec<u8> {
        export::export_entry(entry, format)
    }

    /// Encode the whole log for download
    #[must_use]
    pub fn export_all(&self, format: ExportFormat) -> Vec<u8> {
        export::export_entries(self.log.entries(), format)
    }

    /// Copy the entry's response to the clipboard as pretty JSON
    ///
    /// Never fails; the outcome says whether the text landed.
    pub async fn copy_to_clipboard(
        &self,
        entry: &HistoryEntry,
        clipboard: &dyn Clipboard,
    ) -> CopyOutcome {
        let text = match serde_json::to_string_pretty(&entry.response) {
            Ok(text) => text,
            Err(e) => return CopyOutcome::Failed(e.to_string()),
        };

        match clipboard.write_text(&text).await {
            Ok(()) => CopyOutcome::Copied,
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                CopyOutcome::Failed(e.to_string())
            }
        }
    }

    fn persist(&self) {
        let text = match serde_json::to_string(&self.log) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode history");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.config.key, &text) {
            warn!(error = %e, "Failed to persist history");
        }
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.log);
        }
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("config", &self.config)
            .field("entries", &self.log.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
