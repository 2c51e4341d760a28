//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, invalidate_tag_handler, metrics_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/:key` - Retrieve an entry
/// - `POST`/`PUT /cache/:key` - Store an entry
/// - `DELETE /cache/:key` - Delete an entry
/// - `POST /invalidate/tag/:tag` - Remove every entry bearing a tag
/// - `GET /stats` - Engine stats snapshot
/// - `GET /health` - Health check
/// - `GET /metrics` - Prometheus scrape endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/cache/:key",
            get(get_handler)
                .post(set_handler)
                .put(set_handler)
                .delete(delete_handler),
        )
        .route("/invalidate/tag/:tag", post(invalidate_tag_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
