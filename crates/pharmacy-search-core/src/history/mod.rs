//! Bounded, persisted history of past searches.
//!
//! The list is loaded once from the key-value store and written back in full
//! after every change. Persistence problems, including a database that cannot
//! be opened, are logged and absorbed: the history keeps working in memory and
//! callers never see the error.

use std::path::Path;

use crate::db::{Database, KeyValueStore, MemoryStore};
use crate::models::{CriteriaSet, SearchHistoryEntry};

/// Key under which the serialized history list is stored.
pub const HISTORY_KEY: &str = "patientSearchHistory";

/// Maximum number of remembered searches.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of past searches.
pub struct SearchHistoryStore {
    store: Box<dyn KeyValueStore>,
    entries: Vec<SearchHistoryEntry>,
    last_id: i64,
    degraded: bool,
    /// The on-disk store could not be opened; nothing is being saved
    detached: bool,
}

impl SearchHistoryStore {
    /// Load history from a key-value store.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut history = Self {
            store,
            entries: Vec::new(),
            last_id: 0,
            degraded: false,
            detached: false,
        };
        history.entries = history.read_persisted();
        history.entries.truncate(HISTORY_CAPACITY);
        history.last_id = history.entries.iter().map(|e| e.id).max().unwrap_or(0);
        history
    }

    /// Open history backed by a SQLite file.
    ///
    /// When the file cannot be opened the history lives in memory only and
    /// reports itself as degraded.
    pub fn open_sqlite<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Database::open(path) {
            Ok(db) => Self::load(Box::new(db)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "History database unavailable, history will not be saved"
                );
                let mut history = Self::in_memory();
                history.detached = true;
                history
            }
        }
    }

    /// History that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    fn read_persisted(&mut self) -> Vec<SearchHistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load search history");
                self.degraded = true;
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "Stored search history is unreadable, starting empty");
                self.degraded = true;
                return Vec::new();
            }
        };

        let total = values.len();
        let entries: Vec<SearchHistoryEntry> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if entries.len() < total {
            tracing::warn!(
                skipped = total - entries.len(),
                "Dropped unreadable search history entries"
            );
        }
        entries
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.store
                    .set(HISTORY_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => self.degraded = false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save search history, keeping it in memory");
                self.degraded = true;
            }
        }
    }

    fn next_id(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// Remember a search. Empty criteria are ignored.
    ///
    /// Criteria equal to an existing entry move that search to the front
    /// instead of adding a duplicate.
    pub fn record(&mut self, criteria: &CriteriaSet) -> Option<&SearchHistoryEntry> {
        let criteria = criteria.clone().normalized();
        if criteria.is_empty() {
            return None;
        }

        self.entries
            .retain(|e| e.criteria.clone().normalized() != criteria);

        let entry = SearchHistoryEntry {
            id: self.next_id(),
            label: SearchHistoryEntry::label_for(&criteria),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            criteria,
        };
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);

        self.persist();
        self.entries.first()
    }

    /// All entries, most recent first.
    pub fn list(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    /// The `n` most recent entries.
    pub fn recent(&self, n: usize) -> &[SearchHistoryEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Criteria of a past search, ready to run again.
    pub fn replay(&self, entry_id: i64) -> Option<CriteriaSet> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id)
            .map(|e| e.criteria.clone().normalized())
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether history is not being saved: the database could not be opened,
    /// or the last load or save failed.
    pub fn is_degraded(&self) -> bool {
        self.detached || self.degraded
    }
}
