//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, sets, evictions
//! and expirations.

use serde::Serialize;

use crate::cache::EvictionPolicy;

// == Cache Stats ==
/// Cumulative counters for the lifetime of a cache. `clear` does not reset them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of set calls, inserts and overwrites alike
    pub sets: u64,
    /// Number of entries removed by the eviction policy
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate as a percentage.
    ///
    /// Returns hits / (hits + misses) * 100, or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Stats Snapshot ==
/// Point-in-time view of a cache, returned by `Cache::stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Cache name
    pub name: String,
    /// Cumulative counters
    #[serde(flatten)]
    pub counters: CacheStats,
    /// Live (non-expired) entries at snapshot time
    pub size: usize,
    /// Keys of the live entries, sorted
    pub keys: Vec<String>,
    /// Configured capacity, 0 = unbounded
    pub max_size: usize,
    /// Configured eviction policy
    pub policy: EvictionPolicy,
    /// Hit rate as a percentage
    pub hit_rate: f64,
    /// Snapshot timestamp in RFC 3339 format
    pub taken_at: String,
}

impl StatsSnapshot {
    /// Builds a snapshot, deriving size from `keys` and the hit rate from the counters.
    pub fn new(
        name: impl Into<String>,
        counters: CacheStats,
        keys: Vec<String>,
        max_size: usize,
        policy: EvictionPolicy,
    ) -> Self {
        let hit_rate = counters.hit_rate();
        Self {
            name: name.into(),
            counters,
            size: keys.len(),
            keys,
            max_size,
            policy,
            hit_rate,
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
