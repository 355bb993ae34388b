/// Stored entries are keyed by their creation time in Unix milliseconds.
pub type EntryId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
