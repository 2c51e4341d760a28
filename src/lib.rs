//! Tagcache - an in-memory, tag-indexed cache server
//!
//! Key-addressed storage with TTL expiration, LRU eviction and bulk
//! invalidation through a secondary tag index.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
