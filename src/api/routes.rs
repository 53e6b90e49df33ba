//! API Routes
//!
//! Configures the Axum router with the cache operator and resource endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_stats_handler, create_post_handler, create_tag_handler,
    delete_post_handler, delete_tag_handler, get_post_by_slug_handler, get_post_handler,
    get_tag_by_slug_handler, get_tag_handler, health_handler, list_posts_handler,
    list_tags_handler, update_post_handler, update_tag_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache/clear", post(cache_clear_handler))
        .route(
            "/api/posts",
            get(list_posts_handler).post(create_post_handler),
        )
        .route(
            "/api/posts/:id",
            get(get_post_handler)
                .put(update_post_handler)
                .delete(delete_post_handler),
        )
        .route("/api/posts/slug/:slug", get(get_post_by_slug_handler))
        .route("/api/tags", get(list_tags_handler).post(create_tag_handler))
        .route(
            "/api/tags/:id",
            get(get_tag_handler)
                .put(update_tag_handler)
                .delete(delete_tag_handler),
        )
        .route("/api/tags/slug/:slug", get(get_tag_by_slug_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
