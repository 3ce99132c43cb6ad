//! Cache Core Module
//!
//! The `Cache` facade consumers hold: typed get/set/delete over a
//! [`KvStore`], pattern invalidation, and the stampede-protected
//! [`get_or_set`](Cache::get_or_set).
//!
//! Store failures never reach the caller. They are logged at debug level and
//! the operation degrades to a miss or a no-op, leaving the consumer to
//! recompute from the source of truth.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::backend::{Backend, KvStore, SetOptions};
use crate::cache::stats::StatsRecorder;
use crate::cache::{keys, CacheStats, CacheTier, MemoryStore, RedisStore};
use crate::cache::{LOCK_MARKER, RETRY_BACKOFF_MS};
use crate::config::Config;
use crate::error::CacheError;
use crate::tasks::{spawn_sweep_task, SweepHandle};

// == Cache ==
/// Shared cache handle. Construct once at startup and pass an `Arc<Cache>`
/// to every consumer.
pub struct Cache {
    store: Arc<dyn KvStore>,
    stats: StatsRecorder,
    /// Present when the in-process fallback owns a sweep task
    sweeper: Option<SweepHandle>,
}

impl Cache {
    // == Constructors ==
    /// Wraps an already-built store. No background task is started.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            stats: StatsRecorder::default(),
            sweeper: None,
        }
    }

    /// In-process fallback store with an expiry sweep every `sweep_interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn in_memory(sweep_interval: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sweeper = spawn_sweep_task(store.clone(), sweep_interval);
        Self {
            store,
            stats: StatsRecorder::default(),
            sweeper: Some(sweeper),
        }
    }

    /// Selects the backend once: the remote store when a URL is configured and
    /// reachable, otherwise the in-process fallback.
    pub async fn from_config(config: &Config) -> Self {
        let Some(url) = config.redis_url.as_deref() else {
            info!("Remote store not configured, using in-memory fallback");
            return Self::in_memory(config.sweep_interval());
        };

        match RedisStore::connect(url, config.store_timeout()).await {
            Ok(store) => {
                info!("Using remote store for caching");
                Self::new(Arc::new(store))
            }
            Err(error) => {
                warn!(
                    error = %error,
                    "Remote store unreachable at startup, using in-memory fallback"
                );
                Self::in_memory(config.sweep_interval())
            }
        }
    }

    // == Introspection ==
    pub fn backend(&self) -> Backend {
        self.store.backend()
    }

    /// True when entries and locks are shared across processes.
    pub fn is_available(&self) -> bool {
        self.backend() == Backend::Redis
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Stops background work. The cache stays usable; expired fallback entries
    /// are then only evicted on read.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.shutdown();
            info!("Cache sweep task stopped");
        }
    }

    // == Get ==
    /// Returns the cached value, or `None` when absent, expired, undecodable
    /// as `T`, or when the store fails.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.record_miss();
                return None;
            }
            Err(error) => {
                self.store_failed("get", key, &error);
                self.stats.record_miss();
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Err(error) => {
                debug!(key, error = %error, "Cached payload did not decode, treating as miss");
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Overwrites `key` with `value` for `ttl_secs` seconds. Failures are
    /// logged and dropped.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_secs: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(key, error = %error, "Value did not serialize, not caching");
                return;
            }
        };

        if let Err(error) = self.store.set(key, &payload, SetOptions::ttl(ttl_secs)).await {
            self.store_failed("set", key, &error);
        }
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) {
        if let Err(error) = self.store.delete(key).await {
            self.store_failed("delete", key, &error);
        }
    }

    /// Removes every key matching the glob `pattern` (e.g. `trending:*`).
    ///
    /// Returns the number of keys removed, 0 when the store failed.
    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        match self.store.delete_pattern(pattern).await {
            Ok(removed) => {
                debug!(pattern, removed, "Deleted keys by pattern");
                removed
            }
            Err(error) => {
                self.store_failed("delete_pattern", pattern, &error);
                0
            }
        }
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, computing it with `factory` on a miss.
    ///
    /// At most one caller per key runs the factory and writes the result; it
    /// holds `lock:{key}` for the duration. Callers that find the lock held
    /// poll the cache on a 100/200/300ms schedule, then run the factory
    /// themselves without caching the result.
    ///
    /// Factory errors are returned unchanged, after the lock is released. If
    /// the returned future is dropped while it holds the lock, the release is
    /// scheduled on the runtime instead.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        tier: CacheTier,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key).await {
            return Ok(cached);
        }

        let lock_key = keys::lock(key);
        let ttl = tier.ttl_secs();

        if let Some(lock) = self.acquire_lock(&lock_key, tier.lock_ttl_secs()).await {
            let result = self.populate(key, ttl, factory).await;
            self.release_lock(lock).await;
            return result;
        }

        self.stats.record_lock_contention();
        debug!(key, tier = %tier, "Population in progress elsewhere, waiting");

        for delay_ms in RETRY_BACKOFF_MS {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if let Some(cached) = self.get(key).await {
                return Ok(cached);
            }
        }

        warn!(key, tier = %tier, "Cache stampede fallback triggered");
        self.stats.record_stampede_fallback();
        factory().await
    }

    /// Lock-holder path: re-check, compute, write.
    async fn populate<T, E, F, Fut>(&self, key: &str, ttl_secs: u64, factory: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // Another holder may have finished between the first read and the lock
        if let Some(cached) = self.get(key).await {
            return Ok(cached);
        }

        let value = factory().await?;
        self.set(key, &value, ttl_secs).await;
        self.stats.record_population();
        Ok(value)
    }

    // == Lock ==
    /// Atomic set-if-absent with expiry. A store failure counts as not acquired.
    async fn acquire_lock(&self, lock_key: &str, ttl_secs: u64) -> Option<LockGuard> {
        match self
            .store
            .set(lock_key, LOCK_MARKER, SetOptions::if_absent(ttl_secs))
            .await
        {
            Ok(true) => Some(LockGuard {
                store: Arc::clone(&self.store),
                key: lock_key.to_string(),
                released: false,
            }),
            Ok(false) => None,
            Err(error) => {
                self.store_failed("acquire_lock", lock_key, &error);
                None
            }
        }
    }

    async fn release_lock(&self, mut lock: LockGuard) {
        let result = lock.store.delete(&lock.key).await;
        lock.released = true;
        if let Err(error) = result {
            self.store_failed("release_lock", &lock.key, &error);
        }
    }

    fn store_failed(&self, op: &'static str, key: &str, error: &CacheError) {
        self.stats.record_store_error();
        debug!(op, key, backend = %self.backend(), error = %error, "Cache store error");
    }
}

// == Lock Guard ==
/// A held population lock.
///
/// Released with [`Cache::release_lock`] on every normal return. When the
/// holder is dropped first (caller cancelled, factory panicked) the delete
/// is spawned onto the current runtime.
struct LockGuard {
    store: Arc<dyn KvStore>,
    key: String,
    released: bool,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(key = %self.key, "No runtime to release abandoned lock, left to expire");
            return;
        };

        let store = Arc::clone(&self.store);
        let key = std::mem::take(&mut self.key);
        runtime.spawn(async move {
            match store.delete(&key).await {
                Ok(()) => debug!(key = %key, "Released lock abandoned by an interrupted population"),
                Err(error) => debug!(key = %key, error = %error, "Failed to release abandoned lock"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Feed {
        items: Vec<u32>,
    }

    fn memory_cache() -> Cache {
        Cache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get_until_ttl() {
        let cache = memory_cache();
        let feed = Feed { items: vec![1, 2, 3] };

        cache.set("trending:en", &feed, 60).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get::<Feed>("trending:en").await, Some(feed));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get::<Feed>("trending:en").await, None);
    }

    #[tokio::test]
    async fn test_get_wrong_type_is_miss() {
        let cache = memory_cache();
        cache.set("categories:all", "plain text", 60).await;

        assert_eq!(cache.get::<Feed>("categories:all").await, None);
        assert_eq!(
            cache.get::<String>("categories:all").await.as_deref(),
            Some("plain text")
        );

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = memory_cache();
        cache.set("chef:gordon", &42u32, 300).await;
        cache.delete("chef:gordon").await;

        assert_eq!(cache.get::<u32>("chef:gordon").await, None);
    }

    #[tokio::test]
    async fn test_delete_pattern() {
        let cache = memory_cache();
        cache.set("trending:en", &1u32, 60).await;
        cache.set("trending:fr", &2u32, 60).await;
        cache.set("categories:all", &3u32, 60).await;

        assert_eq!(cache.delete_pattern("trending:*").await, 2);

        assert_eq!(cache.get::<u32>("trending:en").await, None);
        assert_eq!(cache.get::<u32>("trending:fr").await, None);
        assert_eq!(cache.get::<u32>("categories:all").await, Some(3));
    }

    #[tokio::test]
    async fn test_get_or_set_populates_once() {
        let cache = memory_cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Feed, CacheError> = cache
                .get_or_set("trending:en", CacheTier::Trending, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Feed { items: vec![1, 2, 3] })
                })
                .await;
            assert_eq!(value.unwrap(), Feed { items: vec![1, 2, 3] });
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().populations, 1);
    }

    #[tokio::test]
    async fn test_factory_error_releases_lock() {
        let cache = memory_cache();

        let failed: Result<Feed, &str> = cache
            .get_or_set("discover:all:1", CacheTier::Discover, || async {
                Err("database down")
            })
            .await;
        assert_eq!(failed.unwrap_err(), "database down");

        // Nothing cached, and the lock is free again: the next caller populates
        assert_eq!(cache.get::<Feed>("discover:all:1").await, None);
        let recovered: Result<Feed, &str> = cache
            .get_or_set("discover:all:1", CacheTier::Discover, || async {
                Ok(Feed { items: vec![7] })
            })
            .await;
        assert_eq!(recovered.unwrap(), Feed { items: vec![7] });
        assert_eq!(cache.stats().lock_contentions, 0);
    }

    #[tokio::test]
    async fn test_dropped_guard_schedules_release() {
        let store = Arc::new(MemoryStore::new());
        let cache = Cache::new(store.clone());

        let lock = cache.acquire_lock("lock:chef:gordon", 300).await;
        assert!(lock.is_some());
        assert!(cache.acquire_lock("lock:chef:gordon", 300).await.is_none());

        drop(lock);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(store.get("lock:chef:gordon").await.unwrap().is_none());
        assert!(cache.acquire_lock("lock:chef:gordon", 300).await.is_some());
    }

    #[tokio::test]
    async fn test_double_check_under_lock() {
        let cache = memory_cache();
        let calls = AtomicUsize::new(0);

        // Populated between the caller's first read and its lock acquisition
        let value: Result<u32, CacheError> = cache
            .populate("recipe:stats:1", 300, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;
        assert_eq!(value.unwrap(), 1);

        let value: Result<u32, CacheError> = cache
            .populate("recipe:stats:1", 300, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await;
        assert_eq!(value.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_in_memory_is_not_distributed() {
        let cache = Cache::in_memory(Duration::from_secs(60));
        assert_eq!(cache.backend(), Backend::Memory);
        assert!(!cache.is_available());
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_from_config_without_url_uses_memory() {
        let cache = Cache::from_config(&Config::default()).await;
        assert_eq!(cache.backend(), Backend::Memory);
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_from_config_unreachable_url_falls_back() {
        let config = Config {
            redis_url: Some("redis://127.0.0.1:1/".to_string()),
            store_timeout_ms: 200,
            ..Config::default()
        };
        let cache = Cache::from_config(&config).await;
        assert_eq!(cache.backend(), Backend::Memory);
        assert!(!cache.is_available());
        cache.shutdown();
    }
}
