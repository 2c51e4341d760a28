//! Cache Engine Handle
//!
//! Cloneable handle exposing the public cache operations. One readers-writer
//! lock guards the store and tag index as a single logical unit: reads take
//! it shared, structural mutations take it exclusive.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::store::{CacheStore, Lookup, StatsSnapshot};
use crate::cache::{CacheStats, EntrySnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache ==
/// Handle to a cache engine instance. Cheap to clone; all clones share the
/// same store, tag index and counters.
#[derive(Clone)]
pub struct Cache {
    store: Arc<RwLock<CacheStore>>,
    stats: Arc<CacheStats>,
}

impl Cache {
    // == Constructor ==
    /// Builds an engine from the configuration. Counters are shared between
    /// the handle and the store so metrics stay lock-free.
    pub fn from_config(config: &Config) -> Self {
        let stats = Arc::new(CacheStats::new());
        let store = CacheStore::new(config, Arc::clone(&stats));
        Self {
            store: Arc::new(RwLock::new(store)),
            stats,
        }
    }

    // == Get ==
    /// Looks up `key`, returning a snapshot of the live entry.
    ///
    /// Runs under the shared lock; access metadata is updated atomically in
    /// place. An entry observed past its TTL is reported as a miss and its
    /// removal is handed to a detached task, since a shared lock cannot be
    /// upgraded in place. One access-duration sample covers the whole call.
    pub async fn get(&self, key: &str) -> Result<EntrySnapshot> {
        let started = Instant::now();

        let outcome = {
            let store = self.store.read().await;
            store.lookup(key)
        };

        let result = match outcome {
            Lookup::Hit(snapshot) => Ok(snapshot),
            Lookup::Expired => {
                self.schedule_expired_removal(key);
                Err(CacheError::Expired(key.to_string()))
            }
            Lookup::Absent => Err(CacheError::NotFound(key.to_string())),
        };

        self.stats.observe_access_duration(started.elapsed());
        result
    }

    /// Completes a lazily observed expiry off the read path. The removal is
    /// idempotent, so concurrent observers of the same stale entry may both
    /// schedule it.
    fn schedule_expired_removal(&self, key: &str) {
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        tokio::spawn(async move {
            if store.write().await.remove_if_expired(&key) {
                debug!(key = %key, "removed expired entry observed by get");
            }
        });
    }

    // == Set ==
    /// Stores `value` under `key` with the given TTL and tags, evicting the
    /// least recently used entry first if a new key would exceed capacity.
    pub async fn set(
        &self,
        key: String,
        value: Value,
        ttl: Duration,
        tags: HashSet<String>,
    ) -> Result<()> {
        self.store.write().await.set(key, value, ttl, tags)
    }

    // == Delete ==
    /// Removes an entry by key; false if the key was absent.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Invalidate By Tag ==
    /// Removes every entry bearing `tag`, atomically with respect to all
    /// other operations, and returns the number removed.
    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        self.store.write().await.invalidate_by_tag(tag)
    }

    // == Stats ==
    /// Point-in-time stats snapshot under the shared lock.
    pub async fn stats(&self) -> StatsSnapshot {
        self.store.read().await.stats_snapshot()
    }

    // == Cleanup Expired ==
    /// One sweep over the store removing every currently expired entry.
    /// Called by the background sweeper.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    // == Length ==
    /// Current number of entries.
    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// True if the cache holds no entries.
    #[allow(dead_code)]
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_cache(max_size: usize) -> Cache {
        let config = Config {
            max_size,
            ..Config::default()
        };
        Cache::from_config(&config)
    }

    fn tags(names: &[&str]) -> HashSet<String> {
        names.iter().map(|t| t.to_string()).collect()
    }

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = test_cache(10);

        cache
            .set("k".to_string(), json!({"a": [1, 2]}), TTL, tags(&["t"]))
            .await
            .unwrap();

        let snapshot = cache.get("k").await.unwrap();
        assert_eq!(snapshot.value, json!({"a": [1, 2]}));
        assert_eq!(snapshot.tags, vec!["t".to_string()]);
        assert_eq!(snapshot.access_count, 2);
    }

    #[tokio::test]
    async fn test_get_absent_is_not_found() {
        let cache = test_cache(10);

        let result = cache.get("missing").await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_get_misses_and_removes_lazily() {
        let cache = test_cache(10);

        cache
            .set(
                "k".to_string(),
                json!("v"),
                Duration::from_millis(50),
                HashSet::new(),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let result = cache.get("k").await;
        assert!(matches!(result, Err(CacheError::Expired(_))));

        // Give the deferred removal task a chance to run
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_semantics() {
        let cache = test_cache(10);

        cache
            .set("k".to_string(), json!("v"), TTL, HashSet::new())
            .await
            .unwrap();

        assert!(cache.delete("k").await);
        assert!(!cache.delete("k").await);
        assert!(matches!(
            cache.get("k").await,
            Err(CacheError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lru_evicts_least_recently_accessed() {
        let cache = test_cache(2);

        cache
            .set("a".to_string(), json!(1), TTL, HashSet::new())
            .await
            .unwrap();
        cache
            .set("b".to_string(), json!(2), TTL, HashSet::new())
            .await
            .unwrap();

        // Refreshing "a" makes "b" the eviction candidate
        assert_eq!(cache.get("a").await.unwrap().value, json!(1));

        cache
            .set("c".to_string(), json!(3), TTL, HashSet::new())
            .await
            .unwrap();

        assert!(matches!(
            cache.get("b").await,
            Err(CacheError::NotFound(_))
        ));
        let stats = cache.stats().await;
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_items, 2);
    }

    #[tokio::test]
    async fn test_invalidate_by_tag() {
        let cache = test_cache(10);

        cache
            .set(
                "u:1".to_string(),
                json!({"n": "A"}),
                TTL,
                tags(&["users", "user:1"]),
            )
            .await
            .unwrap();
        cache
            .set(
                "u:2".to_string(),
                json!({"n": "B"}),
                TTL,
                tags(&["users", "user:2"]),
            )
            .await
            .unwrap();

        assert_eq!(cache.invalidate_by_tag("users").await, 2);
        assert!(cache.get("u:1").await.is_err());
        assert!(cache.get("u:2").await.is_err());
        assert_eq!(cache.stats().await.total_tags, 0);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_tags() {
        let cache = test_cache(10);

        cache
            .set("k".to_string(), json!("v1"), TTL, tags(&["t1"]))
            .await
            .unwrap();
        cache
            .set("k".to_string(), json!("v2"), TTL, tags(&["t2"]))
            .await
            .unwrap();

        assert_eq!(cache.invalidate_by_tag("t1").await, 0);
        assert_eq!(cache.get("k").await.unwrap().value, json!("v2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_and_writers() {
        let cache = test_cache(50);
        let mut handles = Vec::new();

        for i in 0..100 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .set(format!("key-{i}"), json!(i), TTL, HashSet::new())
                    .await
                    .unwrap();
            }));
        }
        for i in 0..100 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let _ = cache.get(&format!("key-{}", i % 7)).await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats().await;
        assert_eq!(stats.sets, 100);
        assert_eq!(stats.total_items, 50);
        assert_eq!(stats.evictions, 50);
        assert_eq!(cache.len().await, 50);
    }
}
