//! Logger Hook Module
//!
//! Optional observability collaborator attached to a cache. The cache reports
//! every get/set/delete/evict/expire/clear event through it.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::EvictionPolicy;

// == Cache Logger ==
/// Receives cache events. `context` holds `(field, value)` pairs such as
/// `("cache", "sessions")`.
///
/// Implementations may panic; the cache catches and discards the failure.
pub trait CacheLogger: Send + Sync {
    fn debug(&self, message: &str, context: &[(&str, &str)]);
    fn info(&self, message: &str, context: &[(&str, &str)]);
}

// == Tracing Logger ==
/// Forwards cache events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CacheLogger for TracingLogger {
    fn debug(&self, message: &str, context: &[(&str, &str)]) {
        debug!(context = %Fields(context), "{}", message);
    }

    fn info(&self, message: &str, context: &[(&str, &str)]) {
        info!(context = %Fields(context), "{}", message);
    }
}

/// Renders context pairs as `key=value key=value`.
struct Fields<'a>(&'a [(&'a str, &'a str)]);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

// == Cache Event ==
/// Something that happened inside a cache operation.
///
/// Events are buffered while the cache lock is held and dispatched after
/// it is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CacheEvent {
    Hit(String),
    Miss(String),
    Expired(String),
    Set { key: String, ttl: Option<Duration> },
    Deleted(String),
    Evicted(String),
    Cleared(usize),
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheEvent::Hit(key) => write!(f, "Cache hit: {}", key),
            CacheEvent::Miss(key) => write!(f, "Cache miss: {}", key),
            CacheEvent::Expired(key) => write!(f, "Cache expired: {}", key),
            CacheEvent::Set { key, ttl: Some(ttl) } => {
                write!(f, "Cache set: {} TTL={:?}", key, ttl)
            }
            CacheEvent::Set { key, ttl: None } => write!(f, "Cache set: {}", key),
            CacheEvent::Deleted(key) => write!(f, "Cache delete: {}", key),
            CacheEvent::Evicted(key) => write!(f, "Cache evicted: {}", key),
            CacheEvent::Cleared(count) => write!(f, "Cache cleared: {} entries", count),
        }
    }
}

// == Dispatch ==
/// Sends buffered events to `logger`, swallowing any panic it raises.
pub(crate) fn dispatch(
    logger: &dyn CacheLogger,
    cache_name: &str,
    policy: EvictionPolicy,
    events: Vec<CacheEvent>,
) {
    for event in events {
        let message = event.to_string();
        let outcome = catch_unwind(AssertUnwindSafe(|| match &event {
            CacheEvent::Cleared(_) => logger.info(&message, &[("cache", cache_name)]),
            CacheEvent::Evicted(_) => logger.debug(
                &message,
                &[("cache", cache_name), ("policy", policy.as_str())],
            ),
            _ => logger.debug(&message, &[("cache", cache_name)]),
        }));

        if outcome.is_err() {
            warn!(cache = cache_name, "Cache logger panicked while handling '{}'", message);
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<String>>,
    }

    impl CacheLogger for Recorder {
        fn debug(&self, message: &str, context: &[(&str, &str)]) {
            self.lines
                .lock()
                .push(format!("DEBUG {} [{}]", message, Fields(context)));
        }

        fn info(&self, message: &str, context: &[(&str, &str)]) {
            self.lines
                .lock()
                .push(format!("INFO {} [{}]", message, Fields(context)));
        }
    }

    struct Exploding;

    impl CacheLogger for Exploding {
        fn debug(&self, _message: &str, _context: &[(&str, &str)]) {
            panic!("logger backend unavailable");
        }

        fn info(&self, _message: &str, _context: &[(&str, &str)]) {
            panic!("logger backend unavailable");
        }
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(CacheEvent::Hit("a".into()).to_string(), "Cache hit: a");
        assert_eq!(CacheEvent::Miss("a".into()).to_string(), "Cache miss: a");
        assert_eq!(
            CacheEvent::Set {
                key: "a".into(),
                ttl: Some(Duration::from_secs(300))
            }
            .to_string(),
            "Cache set: a TTL=300s"
        );
        assert_eq!(
            CacheEvent::Set { key: "a".into(), ttl: None }.to_string(),
            "Cache set: a"
        );
        assert_eq!(
            CacheEvent::Cleared(4).to_string(),
            "Cache cleared: 4 entries"
        );
    }

    #[test]
    fn test_dispatch_levels_and_context() {
        let recorder = Recorder::default();
        dispatch(
            &recorder,
            "sessions",
            EvictionPolicy::Fifo,
            vec![
                CacheEvent::Evicted("old".into()),
                CacheEvent::Set { key: "new".into(), ttl: None },
                CacheEvent::Cleared(1),
            ],
        );

        let lines = recorder.lines.lock();
        assert_eq!(
            *lines,
            vec![
                "DEBUG Cache evicted: old [cache=sessions policy=fifo]".to_string(),
                "DEBUG Cache set: new [cache=sessions]".to_string(),
                "INFO Cache cleared: 1 entries [cache=sessions]".to_string(),
            ]
        );
    }

    #[test]
    fn test_dispatch_swallows_panics() {
        dispatch(
            &Exploding,
            "sessions",
            EvictionPolicy::Lru,
            vec![CacheEvent::Hit("a".into()), CacheEvent::Cleared(0)],
        );
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        TracingLogger.debug("Cache hit: a", &[("cache", "sessions")]);
        TracingLogger.info("Cache cleared: 0 entries", &[("cache", "sessions")]);
    }
}
