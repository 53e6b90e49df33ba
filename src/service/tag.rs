//! Tag Service

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::CacheManager;
use crate::domain::{slugify, Tag};
use crate::error::{AppError, Result};
use crate::models::{PageParams, TagRequest};
use crate::repository::{Page, TagRepository};

#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    cache: Arc<CacheManager>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, cache: Arc<CacheManager>) -> Self {
        Self { tags, cache }
    }

    // == Create ==
    pub fn create_tag(&self, req: TagRequest) -> Result<Arc<Tag>> {
        let slug = self.check_unique(&req, None)?;
        let saved = Arc::new(self.tags.insert_tag(Tag {
            id: None,
            name: req.name,
            slug: Some(slug),
            description: req.description,
            created_at: None,
        }));

        self.cache.put_tag(Arc::clone(&saved))?;
        self.cache.invalidate_post_lists();
        info!(tag_id = ?saved.id, "Tag created");
        Ok(saved)
    }

    // == Get ==
    pub fn get_tag(&self, id: i64) -> Result<Arc<Tag>> {
        if let Some(tag) = self.cache.get_tag(id) {
            return Ok(tag);
        }
        debug!(tag_id = id, "Tag cache miss");
        let tag = self
            .tags
            .find_tag(id)
            .ok_or_else(|| AppError::TagNotFound(id.to_string()))?;
        let tag = Arc::new(tag);
        self.cache.put_tag(Arc::clone(&tag))?;
        Ok(tag)
    }

    pub fn get_tag_by_slug(&self, slug: &str) -> Result<Arc<Tag>> {
        if let Some(tag) = self.cache.get_tag_by_slug(slug) {
            return Ok(tag);
        }
        debug!(slug, "Tag slug cache miss");
        let tag = self
            .tags
            .find_tag_by_slug(slug)
            .ok_or_else(|| AppError::TagNotFound(slug.to_string()))?;
        let tag = Arc::new(tag);
        self.cache.put_tag(Arc::clone(&tag))?;
        Ok(tag)
    }

    /// Tag listings are small and go straight to the store.
    pub fn get_tags(&self, paging: PageParams) -> Page<Tag> {
        self.tags.list_tags(paging.page(), paging.size())
    }

    // == Update ==
    pub fn update_tag(&self, id: i64, req: TagRequest) -> Result<Arc<Tag>> {
        let mut tag = self
            .tags
            .find_tag(id)
            .ok_or_else(|| AppError::TagNotFound(id.to_string()))?;

        tag.slug = Some(self.check_unique(&req, Some(id))?);
        tag.name = req.name;
        tag.description = req.description;

        let updated = self
            .tags
            .update_tag(tag)
            .ok_or_else(|| AppError::TagNotFound(id.to_string()))?;
        let updated = Arc::new(updated);

        self.cache.put_tag(Arc::clone(&updated))?;
        // Cached posts embed copies of their tags
        self.cache.clear_post_cache();
        info!(tag_id = id, "Tag updated");
        Ok(updated)
    }

    // == Delete ==
    pub fn delete_tag(&self, id: i64) -> Result<()> {
        if !self.tags.delete_tag(id) {
            return Err(AppError::TagNotFound(id.to_string()));
        }
        self.cache.remove_tag(id);
        self.cache.clear_post_cache();
        info!(tag_id = id, "Tag deleted");
        Ok(())
    }

    /// Returns the slug to store after checking name and slug uniqueness.
    fn check_unique(&self, req: &TagRequest, owner: Option<i64>) -> Result<String> {
        if self.tags.tag_name_taken(&req.name, owner) {
            return Err(AppError::Conflict(format!(
                "Tag name '{}' is already in use",
                req.name
            )));
        }
        let slug = match req.slug.as_deref() {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&req.name),
        };
        if slug.is_empty() {
            return Err(AppError::InvalidRequest(
                "Slug cannot be derived from the name".to_string(),
            ));
        }
        if self.tags.tag_slug_taken(&slug, owner) {
            return Err(AppError::Conflict(format!(
                "Tag slug '{}' is already in use",
                slug
            )));
        }
        Ok(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreatePostRequest;
    use crate::repository::InMemoryRepository;
    use crate::service::PostService;

    fn service() -> (TagService, Arc<CacheManager>) {
        let cache = Arc::new(CacheManager::default());
        let service = TagService::new(Arc::new(InMemoryRepository::new()), cache.clone());
        (service, cache)
    }

    /// Tag and post services over one store and cache.
    fn with_posts() -> (TagService, PostService) {
        let cache = Arc::new(CacheManager::default());
        let repo = Arc::new(InMemoryRepository::new());
        let tags = TagService::new(repo.clone(), cache.clone());
        let posts = PostService::new(repo.clone(), repo, cache);
        (tags, posts)
    }

    fn tagged_post(posts: &PostService, tag_id: i64) -> i64 {
        let post = posts
            .create_post(CreatePostRequest {
                author_id: 1,
                title: "Tagged".to_string(),
                content: "content".to_string(),
                slug: None,
                status: None,
                tag_ids: Some(vec![tag_id]),
            })
            .unwrap();
        post.id.unwrap()
    }

    fn request(name: &str) -> TagRequest {
        TagRequest {
            name: name.to_string(),
            slug: None,
            description: None,
        }
    }

    #[test]
    fn test_create_and_get_by_slug() {
        let (service, cache) = service();
        let tag = service.create_tag(request("Rust Lang")).unwrap();
        assert_eq!(tag.slug.as_deref(), Some("rust-lang"));

        let found = service.get_tag_by_slug("rust-lang").unwrap();
        assert_eq!(found.id, tag.id);
        assert_eq!(cache.statistics().tag_cache_hits, 1);
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let (service, _) = service();
        service.create_tag(request("Rust")).unwrap();
        let result = service.create_tag(TagRequest {
            slug: Some("other".to_string()),
            ..request("rust")
        });
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_create_invalidates_post_lists() {
        let (service, cache) = service();
        cache.put_post_list("posts:all", Vec::new(), 0);
        service.create_tag(request("Rust")).unwrap();
        assert!(cache.get_post_list("posts:all").is_none());
    }

    #[test]
    fn test_get_missing_tag() {
        let (service, cache) = service();
        assert!(matches!(service.get_tag(7), Err(AppError::TagNotFound(_))));
        assert_eq!(cache.statistics().tag_cache_misses, 1);
    }

    #[test]
    fn test_update_moves_slug() {
        let (service, cache) = service();
        let tag = service.create_tag(request("Rust")).unwrap();
        let id = tag.id.unwrap();

        service
            .update_tag(
                id,
                TagRequest {
                    slug: Some("rustlang".to_string()),
                    ..request("Rust")
                },
            )
            .unwrap();

        assert!(cache.get_tag_by_slug("rust").is_none());
        assert_eq!(service.get_tag_by_slug("rustlang").unwrap().id, Some(id));
    }

    #[test]
    fn test_delete_tag() {
        let (service, cache) = service();
        let tag = service.create_tag(request("Rust")).unwrap();
        let id = tag.id.unwrap();

        service.delete_tag(id).unwrap();

        assert!(cache.get_tag(id).is_none());
        assert!(matches!(service.get_tag(id), Err(AppError::TagNotFound(_))));
        assert!(matches!(service.delete_tag(id), Err(AppError::TagNotFound(_))));
    }

    #[test]
    fn test_get_tags_pages() {
        let (service, _) = service();
        for name in ["a", "b", "c"] {
            service.create_tag(request(name)).unwrap();
        }
        let page = service.get_tags(PageParams {
            page: Some(1),
            size: Some(2),
        });
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content.len(), 1);
    }

    #[test]
    fn test_delete_tag_refreshes_cached_posts() {
        let (tags, posts) = with_posts();
        let tag_id = tags.create_tag(request("Rust")).unwrap().id.unwrap();
        let post_id = tagged_post(&posts, tag_id);
        assert_eq!(posts.get_post(post_id).unwrap().tags.len(), 1);
        assert_eq!(posts.get_post_by_slug("tagged").unwrap().tags.len(), 1);

        tags.delete_tag(tag_id).unwrap();

        assert!(posts.get_post(post_id).unwrap().tags.is_empty());
        assert!(posts.get_post_by_slug("tagged").unwrap().tags.is_empty());
    }

    #[test]
    fn test_update_tag_refreshes_cached_posts() {
        let (tags, posts) = with_posts();
        let tag_id = tags.create_tag(request("Rust")).unwrap().id.unwrap();
        let post_id = tagged_post(&posts, tag_id);
        posts.get_post(post_id).unwrap();

        tags.update_tag(tag_id, request("Rustacean")).unwrap();

        let post = posts.get_post(post_id).unwrap();
        assert_eq!(post.tags[0].name, "Rustacean");
        assert_eq!(post.tags[0].slug.as_deref(), Some("rustacean"));
    }
}
