//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Wire sentinel for a never-expiring entry.
pub const TTL_NEVER_EXPIRES: i64 = -1;

/// Request body for the set operation (`POST`/`PUT /cache/:key`).
///
/// # TTL mapping
/// `ttl` is an integer number of seconds. Zero or an absent field applies the
/// server's default TTL; the sentinel `-1` stores a never-expiring entry, so
/// never-expires stays expressible even when the default TTL is non-zero.
/// Any other negative value is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The payload to store; opaque to the engine
    pub value: Value,
    /// TTL in seconds; see the mapping above
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Tags to index the entry under; duplicates collapse
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SetRequest {
    /// Maps the wire TTL onto the engine's duration, where zero means
    /// never-expires.
    pub fn effective_ttl(&self, default_ttl_secs: u64) -> Result<Duration> {
        match self.ttl {
            None | Some(0) => Ok(Duration::from_secs(default_ttl_secs)),
            Some(TTL_NEVER_EXPIRES) => Ok(Duration::ZERO),
            Some(secs) if secs > 0 => Ok(Duration::from_secs(secs as u64)),
            Some(secs) => Err(CacheError::InvalidRequest(format!(
                "ttl must be -1, 0 or positive, got {secs}"
            ))),
        }
    }

    /// Collapses the tag list into a set; the index treats duplicate tags
    /// within one request as a single tag.
    pub fn tag_set(&self) -> HashSet<String> {
        self.tags.iter().cloned().collect()
    }
}
