/// Summary history persisted in chrome.storage.local
use log::info;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StorageError;
use crate::mode::SummaryMode;
use crate::storage::KeyValueStore;

/// Storage key holding the history array
pub const HISTORY_KEY: &str = "summaryHistory";

/// Most recent entries kept after every write
pub const HISTORY_CAPACITY: usize = 50;

/// One past summarization result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub title: String,
    /// Already formatted markup, shown as-is when revisited
    pub summary: String,
    #[serde(rename = "type")]
    pub mode: SummaryMode,
    /// Epoch milliseconds
    #[serde(deserialize_with = "deserialize_millis")]
    pub timestamp: i64,
}

// JS numbers may come back through the bridge as floats
fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    f64::deserialize(deserializer).map(|millis| millis as i64)
}

/// Newest-first list of entries, stored as a plain JSON array
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HistoryList {
    pub entries: Vec<HistoryEntry>,
}

impl HistoryList {
    pub fn new() -> Self {
        HistoryList { entries: Vec::new() }
    }

    /// Insert at the front and drop anything past capacity
    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

/// Load/save/clear over an injected key-value store
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        HistoryStore { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn load(&self) -> Result<HistoryList, StorageError> {
        Ok(self.store.get_as(HISTORY_KEY).await?.unwrap_or_default())
    }

    pub async fn save(&self, title: &str, summary: &str, mode: SummaryMode) -> Result<HistoryEntry, StorageError> {
        self.save_at(title, summary, mode, now_millis()).await
    }

    pub async fn save_at(
        &self,
        title: &str,
        summary: &str,
        mode: SummaryMode,
        timestamp: i64,
    ) -> Result<HistoryEntry, StorageError> {
        let mut history = self.load().await?;

        let entry = HistoryEntry {
            title: title.to_string(),
            summary: summary.to_string(),
            mode,
            timestamp,
        };
        history.prepend(entry.clone());

        self.store.set_as(HISTORY_KEY, &history).await?;
        info!("Saved '{}' to history ({} entries)", entry.title, history.len());

        Ok(entry)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.set_as(HISTORY_KEY, &HistoryList::new()).await?;
        info!("Cleared summary history");
        Ok(())
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
