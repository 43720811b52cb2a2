//! Policy Cache - A thread-safe in-memory cache
//!
//! Provides LRU, LFU, FIFO and TTL eviction policies with lazy per-entry
//! expiration and an optional logger hook.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheLogger, EvictionPolicy, StatsSnapshot, TracingLogger};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
