//! Cache Manager Module
//!
//! Owns the post and tag caches plus the post list cache and applies the
//! invalidation rules that tie them together.

use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheStatistics, CachedPage, EntityCache, ListResultCache};
use crate::config::Config;
use crate::domain::{Post, Tag};
use crate::error::Result;

// == Cache Manager ==
/// Process-wide cache collaborator for the post and tag services.
///
/// Constructed once at startup and handed to the services that need it.
#[derive(Debug)]
pub struct CacheManager {
    posts: EntityCache<Post>,
    tags: EntityCache<Tag>,
    post_lists: ListResultCache<Post>,
}

impl CacheManager {
    // == Constructor ==
    pub fn new(
        post_capacity: usize,
        post_slug_capacity: usize,
        tag_capacity: usize,
        post_list_capacity: usize,
    ) -> Self {
        Self {
            posts: EntityCache::new("post", post_capacity, post_slug_capacity),
            tags: EntityCache::new("tag", tag_capacity, tag_capacity),
            post_lists: ListResultCache::new(post_list_capacity),
        }
    }

    /// Creates a manager sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.post_cache_size,
            config.post_slug_cache_size,
            config.tag_cache_size,
            config.post_list_cache_size,
        )
    }

    // == Posts ==
    pub fn get_post(&self, id: i64) -> Option<Arc<Post>> {
        self.posts.get_by_id(id)
    }

    pub fn get_post_by_slug(&self, slug: &str) -> Option<Arc<Post>> {
        self.posts.get_by_slug(slug)
    }

    pub fn put_post(&self, post: impl Into<Arc<Post>>) -> Result<()> {
        self.posts.put(post)
    }

    /// Drops a post from both indices and invalidates every cached list.
    pub fn remove_post(&self, id: i64) {
        self.posts.remove(id);
        self.invalidate_post_lists();
    }

    // == Tags ==
    pub fn get_tag(&self, id: i64) -> Option<Arc<Tag>> {
        self.tags.get_by_id(id)
    }

    pub fn get_tag_by_slug(&self, slug: &str) -> Option<Arc<Tag>> {
        self.tags.get_by_slug(slug)
    }

    pub fn put_tag(&self, tag: impl Into<Arc<Tag>>) -> Result<()> {
        self.tags.put(tag)
    }

    /// Drops a tag from both indices. Post lists can filter by tag, so they
    /// are invalidated as well.
    pub fn remove_tag(&self, id: i64) {
        self.tags.remove(id);
        self.invalidate_post_lists();
    }

    // == Post Lists ==
    pub fn get_post_list(&self, key: &str) -> Option<Arc<CachedPage<Post>>> {
        self.post_lists.get(key)
    }

    pub fn put_post_list(&self, key: impl Into<String>, content: Vec<Arc<Post>>, total: u64) {
        self.post_lists.put(key, content, total);
    }

    pub fn invalidate_post_lists(&self) {
        self.post_lists.invalidate_all();
    }

    // == Clearing ==
    pub fn clear_post_cache(&self) {
        self.posts.clear();
        self.invalidate_post_lists();
    }

    pub fn clear_tag_cache(&self) {
        self.tags.clear();
    }

    /// Empties every cache. Hit/miss counters keep accumulating.
    pub fn clear_all(&self) {
        self.clear_post_cache();
        self.clear_tag_cache();
        info!("All caches cleared");
    }

    // == Statistics ==
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics::new(
            self.posts.statistics(),
            self.tags.statistics(),
            self.post_lists.len(),
        )
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
