//! Cache Module
//!
//! The cache engine: primary key-addressed store, secondary tag index,
//! TTL expiry and LRU eviction policies, and the metric stream fed by every
//! operation.

mod engine;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use engine::Cache;
pub use entry::{CacheEntry, EntrySnapshot};
pub use stats::{CacheStats, DEFAULT_METRICS_PREFIX};
pub use store::{CacheStore, Lookup, StatsSnapshot};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
