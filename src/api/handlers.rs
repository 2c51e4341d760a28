//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EntryResponse, HealthResponse, InvalidateResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine handle; clones share the same store and counters
    pub cache: Cache,
    /// Startup configuration, immutable for the process lifetime
    pub config: Arc<Config>,
    /// Renders the Prometheus text exposition for the scrape endpoint
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Creates the application state, building the engine from the
    /// configuration.
    pub fn new(config: Config, metrics: PrometheusHandle) -> Self {
        let cache = Cache::from_config(&config);
        Self {
            cache,
            config: Arc::new(config),
            metrics,
        }
    }
}

/// Handler for `GET /cache/:key`
///
/// Returns the serialized entry, or 404 for an absent or expired key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let snapshot = state.cache.get(&key).await?;
    Ok(Json(EntryResponse::from(snapshot)))
}

/// Handler for `POST`/`PUT /cache/:key`
///
/// Stores the request payload under the key. The wire TTL is mapped here:
/// zero or absent applies the configured default, `-1` never expires.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let ttl = req.effective_ttl(state.config.default_ttl)?;
    let tags = req.tag_set();
    state.cache.set(key.clone(), req.value, ttl, tags).await?;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for `DELETE /cache/:key`
///
/// Removes the entry; 404 if the key is absent.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key).await {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for `POST /invalidate/tag/:tag`
///
/// Removes every entry bearing the tag; an unknown tag yields zero.
pub async fn invalidate_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<InvalidateResponse> {
    let deleted = state.cache.invalidate_by_tag(&tag).await;
    Json(InvalidateResponse::new(deleted))
}

/// Handler for `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.cache.stats().await;
    Json(StatsResponse::from(snapshot))
}

/// Handler for `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.config.node_id.clone()))
}

/// Handler for `GET /metrics`
///
/// Prometheus text exposition of the engine's counters, gauge and histogram.
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
