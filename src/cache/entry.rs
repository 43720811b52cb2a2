//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access metadata.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Set once, at first insertion
    pub created: Instant,
    /// Updated on every hit and on overwrite
    pub last_accessed: Instant,
    /// Number of hits plus overwrites
    pub access_count: u64,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Cache sequence number at insertion
    pub(crate) insert_seq: u64,
    /// Cache sequence number at the latest touch
    pub(crate) touch_seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live
    /// * `seq` - Cache sequence number, used to order entries that share an instant
    pub fn new(key: String, value: V, ttl: Option<Duration>, seq: u64) -> Self {
        let now = Instant::now();

        Self {
            key,
            value,
            created: now,
            last_accessed: now,
            access_count: 0,
            expires_at: expiry_from(now, ttl),
            insert_seq: seq,
            touch_seq: seq,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// instant, so a zero TTL expires immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired), against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Touch ==
    /// Records an access: refreshes `last_accessed` and bumps `access_count`.
    pub fn touch(&mut self, seq: u64) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
        self.touch_seq = seq;
    }

    // == Update ==
    /// Replaces the value and expiration in place, then touches the entry.
    ///
    /// `created` is preserved, so FIFO ordering is unaffected by overwrites.
    pub fn update(&mut self, value: V, ttl: Option<Duration>, seq: u64) {
        self.value = value;
        self.expires_at = expiry_from(Instant::now(), ttl);
        self.touch(seq);
    }
}

/// TTLs too large to represent as an instant are treated as "never expires".
fn expiry_from(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| now.checked_add(ttl))
}
