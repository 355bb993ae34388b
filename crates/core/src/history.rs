//! Append-only history and saved-items lists.
//!
//! Both lists are JSON arrays stored under a single key each. History is
//! kept newest-first (new entries are inserted at the front); saved items
//! are kept oldest-first (new entries are pushed at the end). Nothing is
//! ever removed or rewritten.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::EntryClock;
use crate::error::CoreError;
use crate::storage::KeyValueStore;
use crate::types::{EntryId, Timestamp};

/// Storage key of the generation history.
pub const HISTORY_KEY: &str = "promptHistory";

/// Storage key of saved enhanced prompts.
pub const SAVED_PROMPTS_KEY: &str = "savedPrompts";

/// Storage key of saved social posts.
pub const SAVED_POSTS_KEY: &str = "savedPosts";

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub original: String,
    pub enhanced: String,
    pub model: String,
    /// Length category or post style the generation was requested with.
    pub length: String,
    #[serde(with = "iso_millis")]
    pub date: Timestamp,
}

/// Output text the user explicitly saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub id: EntryId,
    #[serde(alias = "prompt")]
    pub content: String,
    #[serde(with = "iso_millis")]
    pub date: Timestamp,
}

/// Dates are written the way `Date.prototype.toISOString` writes them
/// (`2024-05-01T12:00:00.000Z`) and read back from any RFC 3339 string.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Generic log
// ---------------------------------------------------------------------------

/// Where [`EntryLog::append`] puts a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOrder {
    NewestFirst,
    OldestFirst,
}

/// A JSON array of `T` stored under one key.
pub struct EntryLog<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    order: InsertionOrder,
    _entry: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> EntryLog<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, order: InsertionOrder) -> Self {
        Self {
            store,
            key: key.into(),
            order,
            _entry: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All entries in stored order. A missing key reads as an empty list.
    pub fn load_all(&self) -> Result<Vec<T>, CoreError> {
        match self.store.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Storage(format!("corrupt '{}' list: {e}", self.key))
            }),
        }
    }

    /// Read-modify-write append. On error nothing was persisted.
    pub fn append(&self, entry: T) -> Result<(), CoreError> {
        let mut entries = self.load_all()?;
        match self.order {
            InsertionOrder::NewestFirst => entries.insert(0, entry),
            InsertionOrder::OldestFirst => entries.push(entry),
        }
        let raw = serde_json::to_string(&entries)
            .map_err(|e| CoreError::Internal(format!("cannot encode '{}': {e}", self.key)))?;
        self.store.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, count = entries.len(), "Appended stored entry");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed stores
// ---------------------------------------------------------------------------

/// Generation history, newest-first.
pub struct HistoryStore {
    log: EntryLog<HistoryEntry>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: EntryLog::new(store, HISTORY_KEY, InsertionOrder::NewestFirst),
        }
    }

    pub fn append(&self, entry: HistoryEntry) -> Result<(), CoreError> {
        self.log.append(entry)
    }

    /// Build and append a new entry stamped by `clock`.
    pub fn record(
        &self,
        clock: &EntryClock,
        original: &str,
        enhanced: &str,
        model: &str,
        tag: &str,
    ) -> Result<HistoryEntry, CoreError> {
        let (id, date) = clock.next();
        let entry = HistoryEntry {
            id,
            original: original.to_string(),
            enhanced: enhanced.to_string(),
            model: model.to_string(),
            length: tag.to_string(),
            date,
        };
        self.append(entry.clone())?;
        Ok(entry)
    }

    pub fn load_all(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        self.log.load_all()
    }
}

/// User-saved outputs, oldest-first. Saving the same text twice stores it
/// twice.
pub struct SavedStore {
    log: EntryLog<SavedEntry>,
}

impl SavedStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            log: EntryLog::new(store, key, InsertionOrder::OldestFirst),
        }
    }

    pub fn key(&self) -> &str {
        self.log.key()
    }

    pub fn append(&self, entry: SavedEntry) -> Result<(), CoreError> {
        self.log.append(entry)
    }

    pub fn save(&self, clock: &EntryClock, content: &str) -> Result<SavedEntry, CoreError> {
        let (id, date) = clock.next();
        let entry = SavedEntry {
            id,
            content: content.to_string(),
            date,
        };
        self.append(entry.clone())?;
        Ok(entry)
    }

    pub fn load_all(&self) -> Result<Vec<SavedEntry>, CoreError> {
        self.log.load_all()
    }
}
