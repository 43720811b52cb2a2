//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with policy-driven eviction and
//! lazy TTL expiration, all behind a single lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::logger::{dispatch, CacheEvent};
use crate::cache::{
    select_victim, CacheEntry, CacheLogger, CacheStats, EvictionPolicy, StatsSnapshot,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache ==
/// Thread-safe in-memory cache with a fixed eviction policy and per-entry TTL.
///
/// Every operation takes the same exclusive lock, so operations from different
/// threads are linearized. Share it between threads with `Arc<Cache<V>>`.
///
/// Expiration is lazy: an expired entry is removed when it is read, when a
/// full cache scans for room, or on an explicit [`purge_expired`](Self::purge_expired).
pub struct Cache<V> {
    name: String,
    max_size: usize,
    policy: EvictionPolicy,
    default_ttl: Option<Duration>,
    inner: Mutex<CacheInner<V>>,
    logger: Option<Arc<dyn CacheLogger>>,
}

/// State guarded by the cache lock.
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
    /// Bumped on every insert and touch; orders entries that share an instant
    seq: u64,
}

impl<V> Cache<V> {
    // == Constructor ==
    /// Creates a new cache from a validated configuration.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `config` fails validation.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        info!(
            "Cache '{}' created: max_size={}, policy={}, default_ttl={:?}",
            config.name, config.max_size, config.policy, config.default_ttl
        );

        Ok(Self {
            name: config.name,
            max_size: config.max_size,
            policy: config.policy,
            default_ttl: config.default_ttl,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
                seq: 0,
            }),
            logger: None,
        })
    }

    /// Attaches a logger that receives every cache event.
    pub fn with_logger(mut self, logger: Arc<dyn CacheLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or expired. Expired entries are
    /// removed and counted both as an expiration and as a miss.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let mut events = self.event_buffer();
        let value = self.inner.lock().get(key, &mut events);
        self.emit(events);
        value
    }

    /// Retrieves the value stored under `key`, or `default` if there is none.
    pub fn get_or(&self, key: &str, default: V) -> V
    where
        V: Clone,
    {
        self.get(key).unwrap_or(default)
    }

    // == Set ==
    /// Stores a value with an optional TTL.
    ///
    /// `ttl` overrides the cache's default TTL; with neither, the entry never
    /// expires. Overwriting an existing key updates it in place and never
    /// evicts. Inserting a new key into a full cache first drops expired
    /// entries, then evicts exactly one entry chosen by the policy if the cache
    /// is still full.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidKey` if the key is empty.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;

        let ttl = ttl.or(self.default_ttl);
        let mut events = self.event_buffer();
        self.inner
            .lock()
            .set(key, value, ttl, self.max_size, self.policy, &mut events);
        self.emit(events);
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut events = self.event_buffer();
        let removed = {
            let mut inner = self.inner.lock();
            inner.entries.remove(key).is_some()
        };
        if removed {
            events.push(|| CacheEvent::Deleted(key.to_string()));
        }
        self.emit(events);
        removed
    }

    // == Clear ==
    /// Removes every entry. Cumulative statistics are kept.
    pub fn clear(&self) {
        let mut events = self.event_buffer();
        let count = {
            let mut inner = self.inner.lock();
            let count = inner.entries.len();
            inner.entries.clear();
            count
        };
        events.push(|| CacheEvent::Cleared(count));
        self.emit(events);
    }

    // == Stats ==
    /// Returns current cache statistics. Does not modify any counter.
    pub fn stats(&self) -> StatsSnapshot {
        let (counters, keys) = {
            let inner = self.inner.lock();
            (inner.stats.clone(), inner.live_keys(Instant::now()))
        };
        StatsSnapshot::new(self.name.clone(), counters, keys, self.max_size, self.policy)
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut events = self.event_buffer();
        let removed = self
            .inner
            .lock()
            .purge_expired(Instant::now(), &mut events);
        self.emit(events);

        if removed > 0 {
            debug!("Cache '{}': purged {} expired entries", self.name, removed);
        }
        removed
    }

    // == Contains Key ==
    /// Returns true if `key` holds a live entry. Does not touch or count.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Keys ==
    /// Returns the keys of all live entries, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().live_keys(Instant::now())
    }

    // == Length ==
    /// Returns the number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        self.inner.lock().live_len(Instant::now())
    }

    // == Is Empty ==
    /// Returns true if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn event_buffer(&self) -> EventBuffer {
        EventBuffer {
            enabled: self.logger.is_some(),
            events: Vec::new(),
        }
    }

    /// Hands buffered events to the logger. Must be called without the lock held.
    fn emit(&self, buffer: EventBuffer) {
        if let Some(logger) = &self.logger {
            if !buffer.events.is_empty() {
                dispatch(&**logger, &self.name, self.policy, buffer.events);
            }
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.name)
            .field("max_size", &self.max_size)
            .field("policy", &self.policy)
            .field("default_ttl", &self.default_ttl)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl<V> CacheInner<V> {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn get(&mut self, key: &str, events: &mut EventBuffer) -> Option<V>
    where
        V: Clone,
    {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                events.push(|| CacheEvent::Miss(key.to_string()));
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            events.push(|| CacheEvent::Expired(key.to_string()));
            return None;
        }

        let seq = self.next_seq();
        let entry = self.entries.get_mut(key)?;
        entry.touch(seq);
        self.stats.record_hit();
        events.push(|| CacheEvent::Hit(key.to_string()));
        Some(entry.value.clone())
    }

    fn set(
        &mut self,
        key: String,
        value: V,
        ttl: Option<Duration>,
        max_size: usize,
        policy: EvictionPolicy,
        events: &mut EventBuffer,
    ) {
        let now = Instant::now();

        // An expired entry is gone as far as callers can tell; replace it
        // rather than reviving it in place.
        if self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            self.entries.remove(&key);
            self.stats.record_expiration();
            events.push(|| CacheEvent::Expired(key.clone()));
        }

        let seq = self.next_seq();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.update(value, ttl, seq);
        } else {
            if max_size > 0 && self.entries.len() >= max_size {
                self.purge_expired(now, events);
                if self.entries.len() >= max_size {
                    self.evict(policy, events);
                }
            }
            let entry = CacheEntry::new(key.clone(), value, ttl, seq);
            self.entries.insert(key.clone(), entry);
        }

        self.stats.record_set();
        events.push(|| CacheEvent::Set { key, ttl });
    }

    /// Removes exactly one entry chosen by `policy`.
    fn evict(&mut self, policy: EvictionPolicy, events: &mut EventBuffer) {
        if let Some(victim) = select_victim(policy, &self.entries) {
            self.entries.remove(&victim);
            self.stats.record_eviction();
            events.push(|| CacheEvent::Evicted(victim));
        }
    }

    fn purge_expired(&mut self, now: Instant, events: &mut EventBuffer) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expiration();
            events.push(|| CacheEvent::Expired(key));
        }

        count
    }

    fn live_keys(&self, now: Instant) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn live_len(&self, now: Instant) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }
}

/// Collects events while the lock is held. Builds nothing when no logger is attached.
struct EventBuffer {
    enabled: bool,
    events: Vec<CacheEvent>,
}

impl EventBuffer {
    fn push(&mut self, event: impl FnOnce() -> CacheEvent) {
        if self.enabled {
            self.events.push(event());
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    Ok(())
}
