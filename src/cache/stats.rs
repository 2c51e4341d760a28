//! Cache Statistics Module
//!
//! Lock-free counters for cache activity, mirrored into the process metric
//! stream so the scrape endpoint and the JSON stats snapshot always agree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Default metric name prefix.
///
/// Running several engines in one process requires giving each a distinct
/// prefix via [`CacheStats::with_prefix`], otherwise their metric streams
/// collide.
pub const DEFAULT_METRICS_PREFIX: &str = "tagcache";

// == Cache Stats ==
/// Tracks cache activity with atomic counters.
///
/// Every `record_*` call also emits to the process metric stream through the
/// `metrics` macros, so counters here and the exported metrics move in
/// lockstep. All methods take `&self` and are safe to call concurrently with
/// any engine operation.
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    evictions: AtomicU64,
    tag_invalidations: AtomicU64,
    names: MetricNames,
}

/// Exported metric names, built once per engine from its prefix.
#[derive(Debug)]
struct MetricNames {
    hits: String,
    misses: String,
    sets: String,
    deletes: String,
    evictions: String,
    tag_invalidations: String,
    items: String,
    access_duration: String,
}

impl MetricNames {
    fn new(prefix: &str) -> Self {
        Self {
            hits: format!("{prefix}_hits_total"),
            misses: format!("{prefix}_misses_total"),
            sets: format!("{prefix}_sets_total"),
            deletes: format!("{prefix}_deletes_total"),
            evictions: format!("{prefix}_evictions_total"),
            tag_invalidations: format!("{prefix}_tag_invalidations_total"),
            items: format!("{prefix}_items_total"),
            access_duration: format!("{prefix}_access_duration_seconds"),
        }
    }
}

impl CacheStats {
    // == Constructors ==
    /// Creates stats with all counters at zero and the default metric prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_METRICS_PREFIX)
    }

    /// Creates stats exporting metrics under a custom name prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            tag_invalidations: AtomicU64::new(0),
            names: MetricNames::new(prefix),
        }
    }

    // == Recorders ==
    /// Records a get that returned a live entry.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.hits.clone()).increment(1);
    }

    /// Records a get of an absent or expired key.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.misses.clone()).increment(1);
    }

    /// Records a completed set, overwrites included.
    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.sets.clone()).increment(1);
    }

    /// Records an explicit delete that removed an entry.
    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.deletes.clone()).increment(1);
    }

    /// Records a capacity-driven LRU removal.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.evictions.clone()).increment(1);
    }

    /// Records a tag invalidation that found its tag. Kept separate from
    /// `deletes`: tag-driven removals are a different event.
    pub fn record_tag_invalidation(&self) {
        self.tag_invalidations.fetch_add(1, Ordering::Relaxed);
        counter!(self.names.tag_invalidations.clone()).increment(1);
    }

    /// Sets the items gauge to the current store size.
    pub fn set_total_items(&self, count: usize) {
        gauge!(self.names.items.clone()).set(count as f64);
    }

    /// Records one access-duration sample covering a whole get call.
    pub fn observe_access_duration(&self, elapsed: Duration) {
        histogram!(self.names.access_duration.clone()).record(elapsed.as_secs_f64());
    }

    // == Readers ==
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn tag_invalidations(&self) -> u64 {
        self.tag_invalidations.load(Ordering::Relaxed)
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}
