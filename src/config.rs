//! Configuration Module
//!
//! Handles loading and validating cache construction parameters.

use std::env;
use std::time::Duration;

use crate::cache::EvictionPolicy;
use crate::error::{CacheError, Result};

/// Cache construction parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Label used in stats and log context
    pub name: String,
    /// Maximum number of entries, 0 = unbounded
    pub max_size: usize,
    /// Eviction policy, fixed for the cache's lifetime
    pub policy: EvictionPolicy,
    /// TTL applied to entries stored without an explicit TTL
    pub default_ttl: Option<Duration>,
}

impl CacheConfig {
    /// Creates a config with the given name and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// LRU cache with the given capacity.
    pub fn lru(name: impl Into<String>, max_size: usize) -> Self {
        Self::new(name)
            .with_max_size(max_size)
            .with_policy(EvictionPolicy::Lru)
    }

    /// TTL cache holding up to 1000 entries, each expiring after `default_ttl`.
    pub fn ttl(name: impl Into<String>, default_ttl: Duration) -> Self {
        Self::new(name)
            .with_max_size(1000)
            .with_policy(EvictionPolicy::Ttl)
            .with_default_ttl(default_ttl)
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = Some(default_ttl);
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Cache name (default: "default")
    /// - `CACHE_MAX_SIZE` - Maximum entries, 0 = unbounded (default: 100)
    /// - `CACHE_POLICY` - One of lru, lfu, fifo, ttl (default: lru)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: none)
    ///
    /// A variable that is set but cannot be parsed is an error rather than a
    /// silent fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("CACHE_NAME") {
            config.name = name;
        }

        if let Some(raw) = lookup("CACHE_MAX_SIZE") {
            config.max_size = raw.trim().parse().map_err(|_| {
                CacheError::InvalidConfig(format!(
                    "CACHE_MAX_SIZE must be a non-negative integer, got '{}'",
                    raw
                ))
            })?;
        }

        if let Some(raw) = lookup("CACHE_POLICY") {
            config.policy = raw.parse()?;
        }

        if let Some(raw) = lookup("CACHE_DEFAULT_TTL") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CacheError::InvalidConfig(format!(
                    "CACHE_DEFAULT_TTL must be a number of seconds, got '{}'",
                    raw
                ))
            })?;
            config.default_ttl = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations a cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "cache name cannot be empty".to_string(),
            ));
        }

        if self.default_ttl == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "default TTL must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            max_size: 100,
            policy: EvictionPolicy::Lru,
            default_ttl: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.max_size, 100);
        assert_eq!(config.policy, EvictionPolicy::Lru);
        assert_eq!(config.default_ttl, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_presets() {
        let lru = CacheConfig::lru("api", 5);
        assert_eq!(lru.max_size, 5);
        assert_eq!(lru.policy, EvictionPolicy::Lru);

        let ttl = CacheConfig::ttl("jobs", Duration::from_secs(300));
        assert_eq!(ttl.max_size, 1000);
        assert_eq!(ttl.policy, EvictionPolicy::Ttl);
        assert_eq!(ttl.default_ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_from_lookup_values() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("CACHE_NAME", "sessions"),
            ("CACHE_MAX_SIZE", "0"),
            ("CACHE_POLICY", "LFU"),
            ("CACHE_DEFAULT_TTL", "60"),
        ]))
        .unwrap();

        assert_eq!(config.name, "sessions");
        assert_eq!(config.max_size, 0);
        assert_eq!(config.policy, EvictionPolicy::Lfu);
        assert_eq!(config.default_ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_config_negative_max_size_rejected() {
        let result = CacheConfig::from_lookup(lookup_from(&[("CACHE_MAX_SIZE", "-5")]));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_unknown_policy_rejected() {
        let result = CacheConfig::from_lookup(lookup_from(&[("CACHE_POLICY", "random")]));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_zero_default_ttl_rejected() {
        let result = CacheConfig::from_lookup(lookup_from(&[("CACHE_DEFAULT_TTL", "0")]));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_empty_name_rejected() {
        let config = CacheConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
