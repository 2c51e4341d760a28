//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{EntrySnapshot, StatsSnapshot};

/// Serialized entry returned by the get operation (`GET /cache/:key`).
///
/// `ttl` is expressed in seconds; zero means the entry never expires.
/// Timestamps are Unix milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: Value,
    pub ttl: u64,
    pub created_at: u64,
    pub accessed_at: u64,
    pub access_count: u64,
    pub tags: Vec<String>,
}

impl From<EntrySnapshot> for EntryResponse {
    fn from(snapshot: EntrySnapshot) -> Self {
        Self {
            key: snapshot.key,
            value: snapshot.value,
            ttl: snapshot.ttl.as_secs(),
            created_at: snapshot.created_at,
            accessed_at: snapshot.accessed_at,
            access_count: snapshot.access_count,
            tags: snapshot.tags,
        }
    }
}

/// Acknowledgement for the set operation (`POST`/`PUT /cache/:key`).
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub status: String,
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            key: key.into(),
        }
    }
}

/// Acknowledgement for the delete operation (`DELETE /cache/:key`).
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            key: key.into(),
        }
    }
}

/// Result of a tag invalidation (`POST /invalidate/tag/:tag`).
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub status: String,
    /// Number of entries actually removed; zero for an unknown tag
    pub deleted: usize,
}

impl InvalidateResponse {
    pub fn new(deleted: usize) -> Self {
        Self {
            status: "success".to_string(),
            deleted,
        }
    }
}

/// Response body for the stats endpoint (`GET /stats`).
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
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
    /// hits / (hits + misses), 0.0 before any get
    pub hit_rate: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(snapshot: StatsSnapshot) -> Self {
        Self {
            total_items: snapshot.total_items,
            total_tags: snapshot.total_tags,
            node_id: snapshot.node_id,
            max_size: snapshot.max_size,
            replication_factor: snapshot.replication_factor,
            hits: snapshot.hits,
            misses: snapshot.misses,
            sets: snapshot.sets,
            deletes: snapshot.deletes,
            evictions: snapshot.evictions,
            tag_invalidations: snapshot.tag_invalidations,
            hit_rate: snapshot.hit_rate,
        }
    }
}

/// Response body for the health endpoint (`GET /health`).
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub node_id: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response for this node.
    pub fn healthy(node_id: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            node_id: node_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
