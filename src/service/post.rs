//! Post Service
//!
//! Read-through access to posts. Point lookups consult the entity cache
//! first, listings consult the list cache, and every write refreshes the
//! affected entry and drops all cached lists.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheManager, CachedPage};
use crate::domain::{slugify, Post, PostListQuery, Tag};
use crate::error::{AppError, Result};
use crate::models::{CreatePostRequest, PageParams, UpdatePostRequest};
use crate::repository::{PostRepository, TagRepository};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    cache: Arc<CacheManager>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self { posts, tags, cache }
    }

    // == Create ==
    pub fn create_post(&self, req: CreatePostRequest) -> Result<Arc<Post>> {
        let tags = self.resolve_tags(req.tag_ids.as_deref())?;
        let slug = self.available_slug(req.slug.as_deref(), &req.title, None)?;

        let saved = self.posts.insert_post(Post {
            id: None,
            author_id: req.author_id,
            title: req.title,
            content: req.content,
            slug: Some(slug),
            status: req.status.unwrap_or_default(),
            tags,
            created_at: None,
            updated_at: None,
            published_at: None,
        });
        let saved = Arc::new(saved);

        self.cache.put_post(Arc::clone(&saved))?;
        self.cache.invalidate_post_lists();
        info!(post_id = ?saved.id, "Post created");
        Ok(saved)
    }

    // == Get ==
    pub fn get_post(&self, id: i64) -> Result<Arc<Post>> {
        if let Some(post) = self.cache.get_post(id) {
            return Ok(post);
        }
        debug!(post_id = id, "Post cache miss");
        let post = self
            .posts
            .find_post(id)
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))?;
        let post = Arc::new(post);
        self.cache.put_post(Arc::clone(&post))?;
        Ok(post)
    }

    pub fn get_post_by_slug(&self, slug: &str) -> Result<Arc<Post>> {
        if let Some(post) = self.cache.get_post_by_slug(slug) {
            return Ok(post);
        }
        debug!(slug, "Post slug cache miss");
        let post = self
            .posts
            .find_post_by_slug(slug)
            .ok_or_else(|| AppError::PostNotFound(slug.to_string()))?;
        let post = Arc::new(post);
        self.cache.put_post(Arc::clone(&post))?;
        Ok(post)
    }

    // == List ==
    /// Returns one page of posts matching `query`, served from the list
    /// cache when the exact same query and page were fetched before.
    pub fn get_posts(&self, query: &PostListQuery, paging: PageParams) -> Arc<CachedPage<Post>> {
        let key = query.cache_key(paging.page(), paging.size());
        if let Some(page) = self.cache.get_post_list(&key) {
            return page;
        }
        debug!(%key, "Post list cache miss");

        let page = self.posts.search_posts(query, paging.page(), paging.size());
        let content: Vec<Arc<Post>> = page.content.into_iter().map(Arc::new).collect();
        self.cache
            .put_post_list(key, content.clone(), page.total_elements);
        Arc::new(CachedPage::new(content, page.total_elements))
    }

    // == Update ==
    pub fn update_post(&self, id: i64, req: UpdatePostRequest) -> Result<Arc<Post>> {
        let mut post = self
            .posts
            .find_post(id)
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))?;

        post.tags = self.resolve_tags(req.tag_ids.as_deref())?;
        // An omitted slug keeps the current one
        let requested = req.slug.as_deref().or(post.slug.as_deref());
        let slug = self.available_slug(requested, &req.title, Some(id))?;
        post.slug = Some(slug);
        post.title = req.title;
        post.content = req.content;
        if let Some(status) = req.status {
            post.status = status;
        }

        let updated = self
            .posts
            .update_post(post)
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))?;
        let updated = Arc::new(updated);

        self.cache.put_post(Arc::clone(&updated))?;
        self.cache.invalidate_post_lists();
        info!(post_id = id, "Post updated");
        Ok(updated)
    }

    // == Delete ==
    pub fn delete_post(&self, id: i64) -> Result<()> {
        if !self.posts.delete_post(id) {
            return Err(AppError::PostNotFound(id.to_string()));
        }
        self.cache.remove_post(id);
        info!(post_id = id, "Post deleted");
        Ok(())
    }

    // == Helpers ==
    /// Loads the tags for `ids`, rejecting unknown ids. Duplicates collapse.
    fn resolve_tags(&self, ids: Option<&[i64]>) -> Result<Vec<Tag>> {
        let Some(ids) = ids else {
            return Ok(Vec::new());
        };
        let mut seen = HashSet::new();
        let unique: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found = self.tags.find_tags(&unique);
        if let Some(missing) = unique
            .iter()
            .find(|id| !found.iter().any(|t| t.id == Some(**id)))
        {
            return Err(AppError::InvalidRequest(format!(
                "Tag with id {} not found",
                missing
            )));
        }
        Ok(found)
    }

    /// Uses the requested slug (or one derived from the title) if no other
    /// post owns it.
    fn available_slug(
        &self,
        requested: Option<&str>,
        title: &str,
        owner: Option<i64>,
    ) -> Result<String> {
        let slug = match requested {
            Some(slug) => slug.trim().to_string(),
            None => slugify(title),
        };
        if slug.is_empty() {
            return Err(AppError::InvalidRequest(
                "Slug cannot be derived from the title".to_string(),
            ));
        }
        if self.posts.post_slug_taken(&slug, owner) {
            return Err(AppError::Conflict(format!(
                "Post slug '{}' is already in use",
                slug
            )));
        }
        Ok(slug)
    }
}
