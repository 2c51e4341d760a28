//! Cache Entry Module
//!
//! Defines the stored unit: an opaque structured value plus TTL and access
//! metadata.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cache entry with its value, TTL and access bookkeeping.
///
/// `accessed_at`, `access_count` and `last_access_seq` are atomics so the
/// hit path can update them while the store lock is held in shared mode.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored payload; never interpreted by the engine
    pub value: Value,
    /// Time-to-live; `Duration::ZERO` means the entry never expires
    pub ttl: Duration,
    /// Creation timestamp (Unix milliseconds), frozen for the entry's lifetime
    pub created_at: u64,
    /// Timestamp of the most recent hit (Unix milliseconds)
    accessed_at: AtomicU64,
    /// Successful gets over this entry's lifetime; insertion counts as the first
    access_count: AtomicU64,
    /// Rank from the store-wide access clock; lowest rank is the LRU candidate
    last_access_seq: AtomicU64,
    /// Tags this entry is indexed under; may be empty
    pub tags: HashSet<String>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the given recency rank.
    pub fn new(value: Value, ttl: Duration, tags: HashSet<String>, access_seq: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            ttl,
            created_at: now,
            accessed_at: AtomicU64::new(now),
            access_count: AtomicU64::new(1),
            last_access_seq: AtomicU64::new(access_seq),
            tags,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is past its TTL.
    ///
    /// An entry with a zero TTL never expires. Otherwise it is expired once
    /// strictly more than `ttl` has elapsed since creation.
    pub fn is_expired(&self) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let elapsed_ms = current_timestamp_ms().saturating_sub(self.created_at);
        elapsed_ms > self.ttl.as_millis() as u64
    }

    // == Touch ==
    /// Records a hit: refreshes the access timestamp, bumps the access count
    /// and stamps the new recency rank. Callable under a shared lock.
    pub fn touch(&self, access_seq: u64) {
        self.accessed_at
            .store(current_timestamp_ms(), Ordering::Relaxed);
        self.access_count.fetch_add(1, Ordering::Relaxed);
        self.last_access_seq.store(access_seq, Ordering::Relaxed);
    }

    /// Timestamp of the most recent hit (Unix milliseconds).
    pub fn accessed_at(&self) -> u64 {
        self.accessed_at.load(Ordering::Relaxed)
    }

    /// Number of successful gets, counting insertion as the first access.
    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    /// Recency rank used by LRU selection.
    pub fn last_access_seq(&self) -> u64 {
        self.last_access_seq.load(Ordering::Relaxed)
    }

    // == Snapshot ==
    /// Takes a point-in-time copy sufficient for the caller to serialize.
    ///
    /// Tags are sorted so serialized output is stable.
    pub fn snapshot(&self, key: &str) -> EntrySnapshot {
        let mut tags: Vec<String> = self.tags.iter().cloned().collect();
        tags.sort();
        EntrySnapshot {
            key: key.to_string(),
            value: self.value.clone(),
            ttl: self.ttl,
            created_at: self.created_at,
            accessed_at: self.accessed_at(),
            access_count: self.access_count(),
            tags,
        }
    }
}

// == Entry Snapshot ==
/// Plain copy of an entry taken under the lock, handed to the boundary.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub key: String,
    pub value: Value,
    pub ttl: Duration,
    pub created_at: u64,
    pub accessed_at: u64,
    pub access_count: u64,
    pub tags: Vec<String>,
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
