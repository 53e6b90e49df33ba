//! API Handlers
//!
//! HTTP request handlers for the cache operator endpoints and the post and
//! tag resources that read through the caches.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::{CacheManager, CacheStatistics};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    ApiResponse, CreatePostRequest, HealthResponse, PageDto, PageParams, PostDto, PostListParams,
    TagDto, TagRequest, UpdatePostRequest,
};
use crate::repository::InMemoryRepository;
use crate::service::{PostService, TagService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub posts: PostService,
    pub tags: TagService,
}

impl AppState {
    /// Wires both services to one in-memory repository and the given cache.
    pub fn new(cache: CacheManager) -> Self {
        let cache = Arc::new(cache);
        let repo = Arc::new(InMemoryRepository::new());
        Self {
            posts: PostService::new(repo.clone(), repo.clone(), cache.clone()),
            tags: TagService::new(repo, cache.clone()),
            cache,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheManager::from_config(config))
    }
}

type Envelope<T> = Json<ApiResponse<T>>;

fn validated(problem: Option<String>) -> Result<()> {
    match problem {
        Some(msg) => Err(AppError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

fn created<T>(message: &str, data: T) -> (StatusCode, Envelope<T>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED, message, Some(data))),
    )
}

// == Cache ==

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Envelope<CacheStatistics> {
    Json(ApiResponse::ok("Cache statistics", state.cache.statistics()))
}

/// Handler for POST /api/cache/clear
///
/// Empties every cache. Hit and miss counters keep their values.
pub async fn cache_clear_handler(State(state): State<AppState>) -> Envelope<()> {
    state.cache.clear_all();
    Json(ApiResponse::new(StatusCode::OK, "Cache cleared", None))
}

// == Posts ==

/// Handler for POST /api/posts
pub async fn create_post_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Envelope<PostDto>)> {
    validated(req.validate())?;
    let post = state.posts.create_post(req)?;
    Ok(created("Post created", PostDto::from(post.as_ref())))
}

/// Handler for GET /api/posts
pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Envelope<PageDto<PostDto>> {
    let paging = params.paging();
    let page = state.posts.get_posts(&params.query(), paging);
    let content = page.content.iter().map(|p| PostDto::from(p.as_ref())).collect();
    Json(ApiResponse::ok(
        "Posts retrieved",
        PageDto::new(content, paging.page(), paging.size(), page.total_elements),
    ))
}

/// Handler for GET /api/posts/:id
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<PostDto>> {
    let post = state.posts.get_post(id)?;
    Ok(Json(ApiResponse::ok("Post retrieved", PostDto::from(post.as_ref()))))
}

/// Handler for GET /api/posts/slug/:slug
pub async fn get_post_by_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Envelope<PostDto>> {
    let post = state.posts.get_post_by_slug(&slug)?;
    Ok(Json(ApiResponse::ok("Post retrieved", PostDto::from(post.as_ref()))))
}

/// Handler for PUT /api/posts/:id
pub async fn update_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Envelope<PostDto>> {
    validated(req.validate())?;
    let post = state.posts.update_post(id, req)?;
    Ok(Json(ApiResponse::ok("Post updated", PostDto::from(post.as_ref()))))
}

/// Handler for DELETE /api/posts/:id
pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>> {
    state.posts.delete_post(id)?;
    Ok(Json(ApiResponse::new(StatusCode::OK, "Post deleted", None)))
}

// == Tags ==

/// Handler for POST /api/tags
pub async fn create_tag_handler(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> Result<(StatusCode, Envelope<TagDto>)> {
    validated(req.validate())?;
    let tag = state.tags.create_tag(req)?;
    Ok(created("Tag created", TagDto::from(tag.as_ref())))
}

/// Handler for GET /api/tags
pub async fn list_tags_handler(
    State(state): State<AppState>,
    Query(paging): Query<PageParams>,
) -> Envelope<PageDto<TagDto>> {
    let page = state.tags.get_tags(paging);
    Json(ApiResponse::ok(
        "Tags retrieved",
        PageDto::from_page(page, paging.page(), paging.size(), |t| TagDto::from(t)),
    ))
}

/// Handler for GET /api/tags/:id
pub async fn get_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<TagDto>> {
    let tag = state.tags.get_tag(id)?;
    Ok(Json(ApiResponse::ok("Tag retrieved", TagDto::from(tag.as_ref()))))
}

/// Handler for GET /api/tags/slug/:slug
pub async fn get_tag_by_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Envelope<TagDto>> {
    let tag = state.tags.get_tag_by_slug(&slug)?;
    Ok(Json(ApiResponse::ok("Tag retrieved", TagDto::from(tag.as_ref()))))
}

/// Handler for PUT /api/tags/:id
pub async fn update_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TagRequest>,
) -> Result<Envelope<TagDto>> {
    validated(req.validate())?;
    let tag = state.tags.update_tag(id, req)?;
    Ok(Json(ApiResponse::ok("Tag updated", TagDto::from(tag.as_ref()))))
}

/// Handler for DELETE /api/tags/:id
pub async fn delete_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>> {
    state.tags.delete_tag(id)?;
    Ok(Json(ApiResponse::new(StatusCode::OK, "Tag deleted", None)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
