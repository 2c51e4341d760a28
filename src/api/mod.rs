//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /cache/:key` - Retrieve an entry by key
//! - `POST`/`PUT /cache/:key` - Store an entry
//! - `DELETE /cache/:key` - Delete an entry
//! - `POST /invalidate/tag/:tag` - Bulk-invalidate by tag
//! - `GET /stats` - Engine stats snapshot
//! - `GET /health` - Health check endpoint
//! - `GET /metrics` - Prometheus scrape endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
