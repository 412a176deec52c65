//! Online-presence tracking.
//!
//! Clients send periodic heartbeats; [`PresenceTracker::count`] reports how
//! many distinct ids have been seen within the TTL. Liveness is always
//! computed lazily from the stored timestamps — [`PresenceTracker::sweep`]
//! only reclaims memory and is never required for a correct count.
//!
//! The clock is injected so TTL behavior is testable without wall-clock
//! sleeps, and the whole tracker sits behind a lock because heartbeat
//! writes and count reads are concurrent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Duration;

use crate::types::Timestamp;

/// Time source for the tracker.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        self.as_ref().now()
    }
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// A settable clock for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// In-process presence store: opaque id -> last-seen timestamp.
pub struct PresenceTracker {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: RwLock<HashMap<String, Timestamp>>,
}

impl PresenceTracker {
    pub fn new(ttl: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            ttl,
            clock: Box::new(clock),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Record or refresh a heartbeat for `id`.
    ///
    /// Idempotent: repeated or retried heartbeats are last-write-wins on the
    /// timestamp.
    pub fn heartbeat(&self, id: &str) {
        let now = self.clock.now();
        let mut entries = self.entries.write().expect("presence lock poisoned");
        entries.insert(id.to_string(), now);
    }

    /// Number of ids whose last heartbeat is within the TTL.
    ///
    /// An id that expired since the last sweep is not counted.
    pub fn count(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().expect("presence lock poisoned");
        entries
            .values()
            .filter(|last_seen| now - **last_seen <= self.ttl)
            .count()
    }

    /// Remove entries past the TTL, returning how many were purged.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().expect("presence lock poisoned");
        let before = entries.len();
        entries.retain(|_, last_seen| now - *last_seen <= self.ttl);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn tracker(ttl_secs: i64) -> (PresenceTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        ));
        (
            PresenceTracker::new(Duration::seconds(ttl_secs), Arc::clone(&clock)),
            clock,
        )
    }

    #[test]
    fn fresh_heartbeat_is_counted() {
        let (tracker, _clock) = tracker(40);
        tracker.heartbeat("a");
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn count_within_ttl_and_exclusion_after() {
        let (tracker, clock) = tracker(40);
        tracker.heartbeat("a");

        clock.advance(Duration::seconds(39));
        assert_eq!(tracker.count(), 1, "inside [T, T+TTL)");

        clock.advance(Duration::seconds(2));
        assert_eq!(tracker.count(), 0, "past T+TTL");
    }

    #[test]
    fn count_is_lazy_and_never_needs_a_sweep() {
        let (tracker, clock) = tracker(40);
        tracker.heartbeat("stale");
        clock.advance(Duration::seconds(120));
        // No sweep has run; the expired id still must not be counted.
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn heartbeat_refreshes_and_is_idempotent() {
        let (tracker, clock) = tracker(40);
        tracker.heartbeat("a");
        clock.advance(Duration::seconds(30));
        tracker.heartbeat("a");
        tracker.heartbeat("a");
        clock.advance(Duration::seconds(30));
        // 60s since the first beat, 30s since the refresh.
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn distinct_ids_count_independently() {
        let (tracker, clock) = tracker(40);
        tracker.heartbeat("a");
        clock.advance(Duration::seconds(25));
        tracker.heartbeat("b");
        clock.advance(Duration::seconds(20));
        // "a" is 45s old, "b" is 20s old.
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn sweep_purges_only_expired_entries() {
        let (tracker, clock) = tracker(40);
        tracker.heartbeat("old");
        clock.advance(Duration::seconds(50));
        tracker.heartbeat("new");

        assert_eq!(tracker.sweep(), 1);
        assert_eq!(tracker.count(), 1);
        // Sweeping again removes nothing.
        assert_eq!(tracker.sweep(), 0);
    }
}
