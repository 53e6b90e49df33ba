//! API Module
//!
//! HTTP handlers and routing for the blog cache server.
//!
//! # Endpoints
//! - `GET /api/cache/stats` - Cache statistics snapshot
//! - `POST /api/cache/clear` - Empty every cache
//! - `/api/posts` and `/api/tags` - Resources served through the caches
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
