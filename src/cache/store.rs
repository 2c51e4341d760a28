//! Cache Store Module
//!
//! The engine core: the key-to-entry map and the tag-to-keys inverted index,
//! mutated as one unit so the two stay consistent, plus LRU eviction and the
//! TTL sweep.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, EntrySnapshot, MAX_KEY_LENGTH};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Lookup Outcome ==
/// Result of a read-path lookup.
#[derive(Debug)]
pub enum Lookup {
    /// Live entry; snapshot taken under the shared lock
    Hit(EntrySnapshot),
    /// Entry present but past its TTL; the caller schedules the removal
    Expired,
    /// No entry for the key
    Absent,
}

// == Cache Store ==
/// Key-addressed storage with a secondary tag index.
///
/// The store owns every entry; the tag index holds key copies only. Both are
/// guarded together by one lock (held by the engine handle), which makes the
/// cross-structure invariant hold trivially: every `(tag, key)` pair in the
/// index corresponds to a live entry carrying that tag, and vice versa.
#[derive(Debug)]
pub struct CacheStore {
    /// Primary key-to-entry map; source of truth for presence and content
    entries: HashMap<String, CacheEntry>,
    /// Inverted index from tag to the keys bearing it; empty buckets are pruned
    tag_index: HashMap<String, HashSet<String>>,
    /// Store-wide recency clock backing LRU selection
    access_clock: AtomicU64,
    /// Counters shared with the engine handle
    stats: Arc<CacheStats>,
    /// Maximum number of entries before LRU eviction
    max_size: usize,
    /// Reported in stats snapshots
    node_id: String,
    /// Recorded only; this engine performs no replication
    replication_factor: u32,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store from the engine configuration.
    pub fn new(config: &Config, stats: Arc<CacheStats>) -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            access_clock: AtomicU64::new(0),
            stats,
            max_size: config.max_size,
            node_id: config.node_id.clone(),
            replication_factor: config.replication_factor,
        }
    }

    /// Next tick of the recency clock. Atomic so the read path can stamp
    /// hits under the shared lock.
    fn next_access_seq(&self) -> u64 {
        self.access_clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    // == Lookup ==
    /// Read-path lookup. Records a hit or miss and, on a hit, refreshes the
    /// entry's access metadata in place.
    ///
    /// Takes `&self`: the only mutations are atomic fields, so this runs
    /// under the shared lock. The expiry check is authoritative; a stale
    /// entry is never returned even if its removal has not happened yet.
    pub fn lookup(&self, key: &str) -> Lookup {
        match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                Lookup::Absent
            }
            Some(entry) if entry.is_expired() => {
                self.stats.record_miss();
                Lookup::Expired
            }
            Some(entry) => {
                entry.touch(self.next_access_seq());
                self.stats.record_hit();
                Lookup::Hit(entry.snapshot(key))
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, fully replacing any existing entry.
    ///
    /// A zero `ttl` means the entry never expires; the default-TTL mapping
    /// happens at the boundary. Inserting a new key at capacity evicts the
    /// least recently used entry first, so the store never exceeds
    /// `max_size`. Overwriting an existing key does not grow the store and
    /// never evicts; the old entry's tag associations are removed before the
    /// new ones are indexed.
    pub fn set(
        &mut self,
        key: String,
        value: Value,
        ttl: Duration,
        tags: HashSet<String>,
    ) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_size {
            self.evict_lru();
        }

        // Replacement is a destroy-then-create: old tag associations go first
        if let Some(old) = self.entries.remove(&key) {
            self.detach_from_tag_index(&key, &old.tags);
        }

        let entry = CacheEntry::new(value, ttl, tags, self.next_access_seq());
        for tag in &entry.tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        self.entries.insert(key, entry);

        self.stats.record_set();
        self.stats.set_total_items(self.entries.len());

        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. Returns false if the key is absent; only an
    /// actual removal advances the deletes counter.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.detach_from_tag_index(key, &entry.tags);
                self.stats.record_delete();
                self.stats.set_total_items(self.entries.len());
                true
            }
            None => false,
        }
    }

    // == Invalidate By Tag ==
    /// Removes every entry bearing `tag` and returns how many were removed.
    ///
    /// Each removed entry is also scrubbed from the buckets of its other
    /// tags, walking the entry's own tag set rather than the whole index.
    /// Tag-driven removals advance the tag-invalidations counter, never the
    /// deletes counter.
    pub fn invalidate_by_tag(&mut self, tag: &str) -> usize {
        let Some(keys) = self.tag_index.remove(tag) else {
            return 0;
        };

        let mut deleted = 0;
        for key in keys {
            if let Some(entry) = self.entries.remove(&key) {
                let other_tags = entry.tags.iter().filter(|t| t.as_str() != tag);
                self.detach_from_tag_index(&key, other_tags);
                deleted += 1;
            }
        }

        self.stats.record_tag_invalidation();
        self.stats.set_total_items(self.entries.len());
        deleted
    }

    // == Remove If Expired ==
    /// Removes `key` only if it is still present and still expired.
    ///
    /// Idempotent completion of a lazily observed expiry: a concurrent
    /// overwrite that raced the deferred removal leaves a fresh entry here,
    /// which must survive.
    pub fn remove_if_expired(&mut self, key: &str) -> bool {
        let still_expired = self.entries.get(key).map_or(false, |e| e.is_expired());
        if !still_expired {
            return false;
        }
        if let Some(entry) = self.entries.remove(key) {
            self.detach_from_tag_index(key, &entry.tags);
            self.stats.set_total_items(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries; one sweep of the background task.
    ///
    /// The items gauge is updated once per sweep, after all removals.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in &expired_keys {
            if let Some(entry) = self.entries.remove(key) {
                self.detach_from_tag_index(key, &entry.tags);
            }
        }

        self.stats.set_total_items(self.entries.len());
        count
    }

    // == Evict LRU ==
    /// Removes the entry with the lowest recency rank, tag associations
    /// included. Ties are broken arbitrarily; an empty store is a no-op.
    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access_seq())
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            if let Some(entry) = self.entries.remove(&key) {
                self.detach_from_tag_index(&key, &entry.tags);
                self.stats.record_eviction();
            }
        }
    }

    // == Tag Index Maintenance ==
    /// Removes `key` from the buckets of the given tags, pruning any bucket
    /// that empties.
    fn detach_from_tag_index<'a, I>(&mut self, key: &str, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
    }

    // == Stats Snapshot ==
    /// Point-in-time view of engine state and counters.
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_items: self.entries.len(),
            total_tags: self.tag_index.len(),
            node_id: self.node_id.clone(),
            max_size: self.max_size,
            replication_factor: self.replication_factor,
            hits: self.stats.hits(),
            misses: self.stats.misses(),
            sets: self.stats.sets(),
            deletes: self.stats.deletes(),
            evictions: self.stats.evictions(),
            tag_invalidations: self.stats.tag_invalidations(),
            hit_rate: self.stats.hit_rate(),
        }
    }

    // == Length ==
    /// Current number of entries.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no entries.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of distinct tags in the index.
    #[allow(dead_code)]
    pub fn tag_count(&self) -> usize {
        self.tag_index.len()
    }

    // == Invariant Check (test support) ==
    /// Asserts the two-way store/tag-index invariant: every entry's tags are
    /// indexed, every indexed pair points at a live entry, no empty buckets.
    #[cfg(test)]
    pub(crate) fn check_tag_index_consistency(&self) {
        for (key, entry) in &self.entries {
            for tag in &entry.tags {
                assert!(
                    self.tag_index
                        .get(tag)
                        .map_or(false, |keys| keys.contains(key)),
                    "entry '{}' carries tag '{}' missing from the index",
                    key,
                    tag
                );
            }
        }
        for (tag, keys) in &self.tag_index {
            assert!(!keys.is_empty(), "empty bucket left for tag '{}'", tag);
            for key in keys {
                assert!(
                    self.entries
                        .get(key)
                        .map_or(false, |entry| entry.tags.contains(tag)),
                    "index pair ('{}', '{}') has no live entry",
                    tag,
                    key
                );
            }
        }
    }
}

// == Stats Snapshot ==
/// Engine-level state and counter values at a single point in time.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub total_items: usize,
    pub total_tags: usize,
    pub node_id: String,
    pub max_size: usize,
    pub replication_factor: u32,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub tag_invalidations: u64,
    pub hit_rate: f64,
}
