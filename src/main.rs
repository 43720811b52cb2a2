//! Policy Cache stress driver
//!
//! Runs a mixed set/get/delete workload from several threads against one
//! shared cache and prints the resulting statistics as JSON.

use std::env;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policy_cache::{Cache, CacheConfig, TracingLogger};

/// Workload parameters.
///
/// # Environment Variables
/// - `STRESS_THREADS` - Worker threads (default: 4)
/// - `STRESS_OPS` - Operations per thread (default: 1000)
/// - `STRESS_KEYS` - Size of the shared key space (default: 64)
/// - `CACHE_TRACE_OPS` - Set to `1` to log every cache event (default: off)
struct Workload {
    threads: usize,
    ops_per_thread: usize,
    key_space: usize,
    trace_ops: bool,
}

impl Workload {
    fn from_env() -> anyhow::Result<Self> {
        let workload = Self {
            threads: env_or("STRESS_THREADS", 4)?,
            ops_per_thread: env_or("STRESS_OPS", 1000)?,
            key_space: env_or("STRESS_KEYS", 64)?,
            trace_ops: env::var("CACHE_TRACE_OPS").is_ok_and(|v| v == "1"),
        };

        if workload.threads == 0 || workload.key_space == 0 {
            return Err(anyhow!("STRESS_THREADS and STRESS_KEYS must be positive"));
        }
        Ok(workload)
    }
}

fn env_or(name: &str, default: usize) -> anyhow::Result<usize> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env().context("Failed to load cache configuration")?;
    let workload = Workload::from_env()?;
    info!(
        "Workload: threads={}, ops_per_thread={}, key_space={}",
        workload.threads, workload.ops_per_thread, workload.key_space
    );

    let mut cache = Cache::<u64>::new(config)?;
    if workload.trace_ops {
        cache = cache.with_logger(Arc::new(TracingLogger));
    }
    let cache = Arc::new(cache);

    let barrier = Arc::new(Barrier::new(workload.threads));
    let started = Instant::now();

    let handles: Vec<_> = (0..workload.threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            let ops = workload.ops_per_thread;
            let key_space = workload.key_space;
            thread::spawn(move || -> policy_cache::Result<()> {
                barrier.wait();
                for i in 0..ops {
                    let key = format!("key-{}", (t * 31 + i * 7) % key_space);
                    match i % 4 {
                        0 | 1 => {
                            cache.get(&key);
                        }
                        2 => cache.set(key, i as u64, None)?,
                        _ => {
                            cache.delete(&key);
                        }
                    }
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))??;
    }

    let elapsed = started.elapsed();
    info!("Workload finished in {:?}", elapsed);

    let stats = cache.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
