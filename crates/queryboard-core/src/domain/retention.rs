//! Retention policy: capacity bound and expiry window.

use chrono::{DateTime, TimeDelta, Utc};

/// Default maximum number of live questions.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Default lifetime of a question, in seconds (24 hours).
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

/// Bounded-collection policy shared by the submit path and the cleanup loop.
///
/// Everything here is arithmetic over counts and timestamps; the ordered
/// range queries (oldest first, created before) are the store's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of live records.
    pub capacity: usize,

    /// How long a record lives after creation.
    pub ttl: TimeDelta,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: TimeDelta::seconds(DEFAULT_TTL_SECS),
        }
    }
}

impl RetentionPolicy {
    pub fn new(capacity: usize, ttl: TimeDelta) -> Self {
        Self { capacity, ttl }
    }

    /// Expiry timestamp for a record created at `created_at`.
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.ttl
    }

    /// Records created strictly before this instant are expired.
    pub fn expiry_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.ttl
    }

    /// How many of the oldest records to delete before inserting one more.
    ///
    /// At most one: an overshoot left by concurrent writers is the cleanup
    /// loop's to trim, not the submitter's.
    pub fn evictions_before_insert(&self, count: usize) -> usize {
        usize::from(count >= self.capacity)
    }

    /// Number of records above capacity.
    pub fn excess(&self, count: usize) -> usize {
        count.saturating_sub(self.capacity)
    }
}
