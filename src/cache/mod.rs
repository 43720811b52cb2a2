//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL and pluggable eviction policies.

mod entry;
mod logger;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use logger::{CacheLogger, TracingLogger};
pub use policy::{select_victim, EvictionPolicy};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::Cache;
