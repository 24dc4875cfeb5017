use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::models::{Language, SummaryLength};

/// Storage key for the serialized history array.
const HISTORY_KEY: &str = "history";

/// Upper bound on retained entries; the oldest falls off first.
pub const MAX_ITEMS: usize = 10;

/// Key-value persistence seam for app state. `Database` implements this
/// over sqlite; `MemoryStore` backs tests and embedded callers.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// One past analysis request, replayable from the stored parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub length: SummaryLength,
    /// Entries written before the language option existed decode as English.
    #[serde(default)]
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub channel_name: String,
}

/// Parameters captured after a successful analysis.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub url: String,
    pub length: SummaryLength,
    pub language: Language,
    pub title: String,
    pub channel_name: String,
}

/// Bounded, deduplicating log of past analyses, newest first. The whole
/// list lives as one JSON array under a single state key and is rewritten
/// on every mutation; at this size that is cheaper than being clever.
pub struct HistoryStore {
    backend: Box<dyn StateStore>,
}

impl HistoryStore {
    pub fn new(backend: Box<dyn StateStore>) -> Self {
        Self { backend }
    }

    /// All entries, newest first. A missing key, an unreadable backend and
    /// a corrupt array all come back as empty; history is never the reason
    /// the app fails to start.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.backend.read(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding corrupt history: {e}");
                Vec::new()
            }
        }
    }

    /// Record an analysis. An existing entry for the same URL is dropped
    /// and the new one goes to the front with a fresh id and timestamp;
    /// past `MAX_ITEMS` the oldest entry is evicted. Returns the updated
    /// list.
    pub fn add(&self, new: NewHistoryEntry) -> Result<Vec<HistoryEntry>> {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            url: new.url,
            length: new.length,
            language: new.language,
            timestamp: Utc::now(),
            title: new.title,
            channel_name: new.channel_name,
        };

        let mut entries = self.list();
        entries.retain(|e| e.url != entry.url);
        entries.insert(0, entry);
        entries.truncate(MAX_ITEMS);

        self.persist(&entries)?;
        Ok(entries)
    }

    /// Drop the entry with the given id. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.list();
        entries.retain(|e| e.id != id);
        self.persist(&entries)?;
        Ok(entries)
    }

    /// Forget everything. The returned list is always empty.
    pub fn clear(&self) -> Result<Vec<HistoryEntry>> {
        self.backend.delete(HISTORY_KEY)?;
        Ok(Vec::new())
    }

    /// Look up a single entry by id.
    pub fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.backend.write(HISTORY_KEY, &raw)
    }
}

/// In-memory state store.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
