//! Time source for stored entries.
//!
//! Entry ids double as creation timestamps (Unix milliseconds). Two entries
//! created within the same millisecond would collide, so [`EntryClock`]
//! bumps the id past the last one it issued.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use crate::types::{EntryId, Timestamp};

/// Source of wall-clock time. Swappable so tests can pin dates.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The real UTC clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    pub fn from_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Issues strictly increasing entry ids paired with their creation date.
pub struct EntryClock {
    clock: Box<dyn Clock>,
    last_id: Mutex<EntryId>,
}

impl EntryClock {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last_id: Mutex::new(0),
        }
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    /// Next `(id, date)` pair. The id is the current time in milliseconds,
    /// or one past the previous id if the clock has not advanced.
    pub fn next(&self) -> (EntryId, Timestamp) {
        let now = self.clock.now();
        let mut last = self
            .last_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = now.timestamp_millis().max(*last + 1);
        *last = id;
        (id, now)
    }
}

impl Default for EntryClock {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_clock_millis() {
        let clock = EntryClock::new(FixedClock::from_millis(1_700_000_000_000));
        let (id, date) = clock.next();
        assert_eq!(id, 1_700_000_000_000);
        assert_eq!(date.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn ids_never_repeat_on_a_frozen_clock() {
        let clock = EntryClock::new(FixedClock::from_millis(1_000));
        let ids: Vec<_> = (0..3).map(|_| clock.next().0).collect();
        assert_eq!(ids, vec![1_000, 1_001, 1_002]);
    }
}
