//! Request DTOs for the blog API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::domain::{PostListQuery, PostStatus};

/// Default page size when the client does not send one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Maximum title, name and slug length in characters
pub const MAX_TITLE_LENGTH: usize = 255;

fn check_text(field: &str, value: &str, max: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} cannot be empty", field));
    }
    if value.chars().count() > max {
        return Some(format!("{} exceeds maximum length of {} characters", field, max));
    }
    None
}

/// Request body for creating a post (POST /api/posts)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    /// Derived from the title when omitted
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

impl CreatePostRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.author_id <= 0 {
            return Some(format!("Author with id {} not found", self.author_id));
        }
        check_text("Title", &self.title, MAX_TITLE_LENGTH)
            .or_else(|| check_text("Content", &self.content, usize::MAX))
            .or_else(|| {
                self.slug
                    .as_deref()
                    .and_then(|s| check_text("Slug", s, MAX_TITLE_LENGTH))
            })
    }
}

/// Request body for updating a post (PUT /api/posts/:id)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    /// Unchanged when omitted
    #[serde(default)]
    pub slug: Option<String>,
    /// Unchanged when omitted
    #[serde(default)]
    pub status: Option<PostStatus>,
    /// Replaces the post's tags; omitted means no tags
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("Title", &self.title, MAX_TITLE_LENGTH)
            .or_else(|| check_text("Content", &self.content, usize::MAX))
            .or_else(|| {
                self.slug
                    .as_deref()
                    .and_then(|s| check_text("Slug", s, MAX_TITLE_LENGTH))
            })
    }
}

/// Request body for creating or updating a tag
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub name: String,
    /// Derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TagRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("Name", &self.name, 50).or_else(|| {
            self.slug
                .as_deref()
                .and_then(|s| check_text("Slug", s, 50))
        })
    }
}

/// Query string for post listings (GET /api/posts)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListParams {
    pub author_id: Option<i64>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub published_only: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PostListParams {
    /// Filters for the listing. Blank strings count as absent and
    /// `publishedOnly=true` restricts to published posts.
    pub fn query(&self) -> PostListQuery {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        PostListQuery {
            author_id: self.author_id,
            tag_slug: non_blank(&self.tag),
            search: non_blank(&self.search),
            status: (self.published_only == Some(true)).then_some(PostStatus::Published),
        }
    }

    pub fn paging(&self) -> PageParams {
        PageParams {
            page: self.page,
            size: self.size,
        }
    }
}

/// Query string for plain paging (GET /api/tags)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    /// Requested size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn size(&self) -> u32 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}
