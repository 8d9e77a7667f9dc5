//! In-process cache-aside store for aggregate reads.
//!
//! Entries carry their own TTL (moka per-entry expiry). Concurrent misses on
//! one key are collapsed into a single computation; failed computations are
//! never stored. A disabled store computes on every call.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::counter;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::config::{CacheConfig, MenuItem};
use crate::constants::cache::FIXED_KEYS;

/// Values the aggregate cache can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Menu(Arc<Vec<MenuItem>>),
    Count(u64),
}

#[derive(Clone)]
struct Entry {
    value: CachedValue,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Process-wide cache-aside store. Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct CacheAside {
    inner: Option<Cache<String, Entry>>,
}

impl CacheAside {
    /// Capacity never drops below the number of aggregate keys.
    #[must_use]
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries.max(FIXED_KEYS))
            .expire_after(PerEntryTtl)
            .build();

        Self { inner: Some(cache) }
    }

    /// A store that never keeps anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { inner: None }
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.max_entries)
        } else {
            Self::disabled()
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns the live entry for `key`, or runs `compute` and stores its
    /// result for `ttl`.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<CachedValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedValue, E>>,
        E: Clone + Send + Sync + 'static,
    {
        let Some(cache) = &self.inner else {
            counter!("cache_requests_total", "key" => key.to_string(), "result" => "bypass")
                .increment(1);
            return compute().await;
        };

        let init = async move { compute().await.map(|value| Entry { value, ttl }) };

        let entry = cache
            .entry(key.to_string())
            .or_try_insert_with(init)
            .await
            .map_err(|e: Arc<E>| (*e).clone())?;

        let result = if entry.is_fresh() { "miss" } else { "hit" };
        counter!("cache_requests_total", "key" => key.to_string(), "result" => result)
            .increment(1);
        debug!(key, result, "aggregate cache lookup");

        Ok(entry.into_value().value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(30);

    async fn counted(
        cache: &CacheAside,
        calls: &AtomicUsize,
        ttl: Duration,
        value: u64,
    ) -> Result<CachedValue, String> {
        cache
            .get_or_compute("k", ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(CachedValue::Count(value))
            })
            .await
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_compute() {
        let cache = CacheAside::new(16);
        let calls = AtomicUsize::new(0);

        let first = counted(&cache, &calls, TTL, 5).await.unwrap();
        let second = counted(&cache, &calls, TTL, 9).await.unwrap();

        assert_eq!(first, CachedValue::Count(5));
        assert_eq!(second, CachedValue::Count(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_still_holds_every_aggregate_key() {
        let cache = CacheAside::new(0);
        let calls = AtomicUsize::new(0);

        for _ in 0..5 {
            for key in ["menu", "cards_count", "users_count"] {
                let value: Result<_, String> = cache
                    .get_or_compute(key, TTL, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(CachedValue::Count(1))
                    })
                    .await;
                assert_eq!(value.unwrap(), CachedValue::Count(1));
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_is_cached() {
        let cache = CacheAside::new(16);
        let calls = AtomicUsize::new(0);

        assert_eq!(counted(&cache, &calls, TTL, 0).await.unwrap(), CachedValue::Count(0));
        assert_eq!(counted(&cache, &calls, TTL, 0).await.unwrap(), CachedValue::Count(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let cache = CacheAside::new(16);
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_millis(100);

        assert_eq!(counted(&cache, &calls, ttl, 1).await.unwrap(), CachedValue::Count(1));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(counted(&cache, &calls, ttl, 2).await.unwrap(), CachedValue::Count(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_store_always_computes() {
        let cache = CacheAside::disabled();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, TTL, 1).await.unwrap();
        counted(&cache, &calls, TTL, 1).await.unwrap();

        assert!(!cache.is_enabled());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CacheAside::new(16);
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_compute("k", TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<CachedValue, String>("storage down".to_string())
            })
            .await;
        assert_eq!(err, Err("storage down".to_string()));

        assert_eq!(counted(&cache, &calls, TTL, 3).await.unwrap(), CachedValue::Count(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_compute_once() {
        let cache = CacheAside::new(16);
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_compute("k", TTL, || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, String>(CachedValue::Count(42))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), CachedValue::Count(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = CacheAside::new(16);

        let a: Result<_, String> = cache
            .get_or_compute("a", TTL, || async { Ok(CachedValue::Count(1)) })
            .await;
        let b: Result<_, String> = cache
            .get_or_compute("b", TTL, || async { Ok(CachedValue::Count(2)) })
            .await;

        assert_eq!(a.unwrap(), CachedValue::Count(1));
        assert_eq!(b.unwrap(), CachedValue::Count(2));

        let a: Result<_, String> = cache
            .get_or_compute("a", TTL, || async { Ok(CachedValue::Count(7)) })
            .await;
        assert_eq!(a.unwrap(), CachedValue::Count(1));
    }
}
