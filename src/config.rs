//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Consumed once at startup; the engine treats its copy as
/// immutable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold before LRU eviction
    pub max_size: usize,
    /// Default TTL in seconds applied when a set request carries no TTL;
    /// zero makes the default never-expiring
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Node label reported in stats and health responses
    pub node_id: String,
    /// Recorded and surfaced in stats; the engine performs no replication
    pub replication_factor: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE` - Maximum cache entries (default: 10000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `NODE_ID` - Node label (default: "node-1")
    /// - `REPLICATION_FACTOR` - Recorded only (default: 2)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            node_id: env::var("NODE_ID").unwrap_or_else(|_| "node-1".to_string()),
            replication_factor: env::var("REPLICATION_FACTOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            default_ttl: 300,
            cleanup_interval: 60,
            server_port: 8080,
            node_id: "node-1".to_string(),
            replication_factor: 2,
        }
    }
}
