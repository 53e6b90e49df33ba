//! Response DTOs for the blog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Post, PostStatus, Tag};
use crate::repository::Page;

/// Envelope wrapping every successful response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// 200 envelope carrying `data`
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, Some(data))
    }
}

/// Tag as embedded in a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSummaryDto {
    pub id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
}

/// Post representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Option<i64>,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub status: PostStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<TagSummaryDto>,
}

impl From<&Post> for PostDto {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title.clone(),
            content: post.content.clone(),
            slug: post.slug.clone(),
            status: post.status,
            created_at: post.created_at,
            updated_at: post.updated_at,
            published_at: post.published_at,
            tags: post
                .tags
                .iter()
                .map(|t| TagSummaryDto {
                    id: t.id,
                    name: t.name.clone(),
                    slug: t.slug.clone(),
                })
                .collect(),
        }
    }
}

/// Tag representation returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Tag> for TagDto {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            description: tag.description.clone(),
            created_at: tag.created_at,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageDto<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size as u64)
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn from_page<S>(page: Page<S>, number: u32, size: u32, map: impl Fn(&S) -> T) -> Self {
        let content = page.content.iter().map(map).collect();
        Self::new(content, number, size, page.total_elements)
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
