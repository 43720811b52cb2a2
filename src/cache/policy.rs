//! Eviction Policy Module
//!
//! Defines the eviction strategies and victim selection for overflowing caches.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::CacheEntry;
use crate::error::CacheError;

// == Eviction Policy ==
/// Strategy used to choose which entry is removed when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
    /// First in, first out
    Fifo,
    /// Entries are meant to leave by expiration; overflow falls back to LRU
    Ttl,
}

impl EvictionPolicy {
    /// Lowercase policy name, as used in configuration and stats.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Fifo => "fifo",
            EvictionPolicy::Ttl => "ttl",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            "fifo" => Ok(EvictionPolicy::Fifo),
            "ttl" => Ok(EvictionPolicy::Ttl),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction policy '{}'",
                other
            ))),
        }
    }
}

// == Select Victim ==
/// Picks the key to evict under `policy`, or `None` if there are no entries.
///
/// Every comparator ends with a per-cache sequence number, so the choice never
/// depends on map iteration order:
/// - `Lru` / `Ttl`: oldest `last_accessed`
/// - `Lfu`: smallest `access_count`, then least recently touched
/// - `Fifo`: oldest `created`
pub fn select_victim<V>(
    policy: EvictionPolicy,
    entries: &HashMap<String, CacheEntry<V>>,
) -> Option<String> {
    let victim = match policy {
        EvictionPolicy::Lru | EvictionPolicy::Ttl => entries
            .iter()
            .min_by_key(|(_, e)| (e.last_accessed, e.touch_seq)),
        EvictionPolicy::Lfu => entries
            .iter()
            .min_by_key(|(_, e)| (e.access_count, e.last_accessed, e.touch_seq)),
        EvictionPolicy::Fifo => entries
            .iter()
            .min_by_key(|(_, e)| (e.created, e.insert_seq)),
    };

    victim.map(|(key, _)| key.clone())
}
