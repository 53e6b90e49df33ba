//! Domain Module
//!
//! Blog entities held by the store and shared through the caches.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheEntry, ListKeyBuilder};

// == Post Status ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Tag ==
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// `None` until the store assigns one
    pub id: Option<i64>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CacheEntry for Tag {
    fn cache_id(&self) -> Option<i64> {
        self.id
    }

    fn cache_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

// == Post ==
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// `None` until the store assigns one
    pub id: Option<i64>,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<Tag>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug.as_deref() == Some(slug))
    }
}

impl CacheEntry for Post {
    fn cache_id(&self) -> Option<i64> {
        self.id
    }

    fn cache_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

// == Post List Query ==
/// Filters for a post listing. Every field is optional; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostListQuery {
    pub author_id: Option<i64>,
    pub tag_slug: Option<String>,
    pub search: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostListQuery {
    /// Whether `post` satisfies every filter that is set.
    pub fn matches(&self, post: &Post) -> bool {
        if self.author_id.is_some_and(|author| post.author_id != author) {
            return false;
        }
        if self.status.is_some_and(|status| post.status != status) {
            return false;
        }
        if let Some(tag) = &self.tag_slug {
            if !post.has_tag(tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return post.title.to_lowercase().contains(&needle)
                || post.content.to_lowercase().contains(&needle);
        }
        true
    }

    /// List-cache key for this query at the given page.
    pub fn cache_key(&self, page: u32, size: u32) -> String {
        ListKeyBuilder::new("posts")
            .value(self.author_id)
            .text(self.tag_slug.as_deref())
            .text(self.search.as_deref())
            .value(self.status)
            .page(page, size)
    }
}

// == Slugify ==
/// Lowercases `input` and collapses every run of non-alphanumerics into `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
