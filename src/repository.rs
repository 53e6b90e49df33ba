//! Repository Module
//!
//! Authoritative storage for posts and tags. The services read through the
//! caches and fall back to these traits on a miss.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::cache::lock::{rw_read, rw_write};
use crate::domain::{Post, PostListQuery, PostStatus, Tag};

const SOURCE: &str = "repository";

// == Page ==
/// One page of a listing plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
}

impl<T> Page<T> {
    fn slice(all: Vec<T>, page: u32, size: u32) -> Self {
        let total_elements = all.len() as u64;
        let start = (page as usize).saturating_mul(size as usize);
        let content = all.into_iter().skip(start).take(size as usize).collect();
        Self {
            content,
            total_elements,
        }
    }
}

// == Post Repository ==
pub trait PostRepository: Send + Sync {
    fn find_post(&self, id: i64) -> Option<Post>;

    fn find_post_by_slug(&self, slug: &str) -> Option<Post>;

    /// Posts matching `query`, ordered by id.
    fn search_posts(&self, query: &PostListQuery, page: u32, size: u32) -> Page<Post>;

    /// Stores a new post and returns it with its assigned id and timestamps.
    fn insert_post(&self, post: Post) -> Post;

    /// Replaces an existing post. Returns `None` if the id is unknown.
    fn update_post(&self, post: Post) -> Option<Post>;

    /// Returns whether a row was deleted.
    fn delete_post(&self, id: i64) -> bool;

    /// Whether another post already uses `slug`.
    fn post_slug_taken(&self, slug: &str, except: Option<i64>) -> bool;
}

// == Tag Repository ==
pub trait TagRepository: Send + Sync {
    fn find_tag(&self, id: i64) -> Option<Tag>;

    fn find_tag_by_slug(&self, slug: &str) -> Option<Tag>;

    /// Tags for the given ids; unknown ids are skipped.
    fn find_tags(&self, ids: &[i64]) -> Vec<Tag>;

    fn list_tags(&self, page: u32, size: u32) -> Page<Tag>;

    fn insert_tag(&self, tag: Tag) -> Tag;

    fn update_tag(&self, tag: Tag) -> Option<Tag>;

    fn delete_tag(&self, id: i64) -> bool;

    fn tag_name_taken(&self, name: &str, except: Option<i64>) -> bool;

    fn tag_slug_taken(&self, slug: &str, except: Option<i64>) -> bool;
}

// == In-Memory Repository ==
#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<i64, Post>,
    tags: BTreeMap<i64, Tag>,
    next_post_id: i64,
    next_tag_id: i64,
}

/// Process-local store implementing both repositories.
///
/// Posts embed copies of their tags, so tag updates and deletes are
/// propagated to every post that carries the tag.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn stamp_publication(post: &mut Post) {
    if post.status == PostStatus::Published && post.published_at.is_none() {
        post.published_at = Some(Utc::now());
    }
}

impl PostRepository for InMemoryRepository {
    fn find_post(&self, id: i64) -> Option<Post> {
        rw_read(&self.tables, SOURCE, "find_post").posts.get(&id).cloned()
    }

    fn find_post_by_slug(&self, slug: &str) -> Option<Post> {
        rw_read(&self.tables, SOURCE, "find_post_by_slug")
            .posts
            .values()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned()
    }

    fn search_posts(&self, query: &PostListQuery, page: u32, size: u32) -> Page<Post> {
        let tables = rw_read(&self.tables, SOURCE, "search_posts");
        let matching: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        Page::slice(matching, page, size)
    }

    fn insert_post(&self, mut post: Post) -> Post {
        let mut tables = rw_write(&self.tables, SOURCE, "insert_post");
        tables.next_post_id += 1;
        let id = tables.next_post_id;
        let now = Utc::now();
        post.id = Some(id);
        post.created_at = Some(now);
        post.updated_at = Some(now);
        stamp_publication(&mut post);
        tables.posts.insert(id, post.clone());
        post
    }

    fn update_post(&self, mut post: Post) -> Option<Post> {
        let id = post.id?;
        let mut tables = rw_write(&self.tables, SOURCE, "update_post");
        let existing = tables.posts.get_mut(&id)?;
        post.created_at = existing.created_at;
        post.updated_at = Some(Utc::now());
        stamp_publication(&mut post);
        *existing = post.clone();
        Some(post)
    }

    fn delete_post(&self, id: i64) -> bool {
        rw_write(&self.tables, SOURCE, "delete_post")
            .posts
            .remove(&id)
            .is_some()
    }

    fn post_slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        rw_read(&self.tables, SOURCE, "post_slug_taken")
            .posts
            .values()
            .any(|p| p.slug.as_deref() == Some(slug) && p.id != except)
    }
}

impl TagRepository for InMemoryRepository {
    fn find_tag(&self, id: i64) -> Option<Tag> {
        rw_read(&self.tables, SOURCE, "find_tag").tags.get(&id).cloned()
    }

    fn find_tag_by_slug(&self, slug: &str) -> Option<Tag> {
        rw_read(&self.tables, SOURCE, "find_tag_by_slug")
            .tags
            .values()
            .find(|t| t.slug.as_deref() == Some(slug))
            .cloned()
    }

    fn find_tags(&self, ids: &[i64]) -> Vec<Tag> {
        let tables = rw_read(&self.tables, SOURCE, "find_tags");
        ids.iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect()
    }

    fn list_tags(&self, page: u32, size: u32) -> Page<Tag> {
        let all: Vec<Tag> = rw_read(&self.tables, SOURCE, "list_tags")
            .tags
            .values()
            .cloned()
            .collect();
        Page::slice(all, page, size)
    }

    fn insert_tag(&self, mut tag: Tag) -> Tag {
        let mut tables = rw_write(&self.tables, SOURCE, "insert_tag");
        tables.next_tag_id += 1;
        let id = tables.next_tag_id;
        tag.id = Some(id);
        tag.created_at = Some(Utc::now());
        tables.tags.insert(id, tag.clone());
        tag
    }

    fn update_tag(&self, mut tag: Tag) -> Option<Tag> {
        let id = tag.id?;
        let mut tables = rw_write(&self.tables, SOURCE, "update_tag");
        let existing = tables.tags.get_mut(&id)?;
        tag.created_at = existing.created_at;
        *existing = tag.clone();

        for post in tables.posts.values_mut() {
            for embedded in post.tags.iter_mut().filter(|t| t.id == Some(id)) {
                *embedded = tag.clone();
            }
        }
        Some(tag)
    }

    fn delete_tag(&self, id: i64) -> bool {
        let mut tables = rw_write(&self.tables, SOURCE, "delete_tag");
        if tables.tags.remove(&id).is_none() {
            return false;
        }
        for post in tables.posts.values_mut() {
            post.tags.retain(|t| t.id != Some(id));
        }
        true
    }

    fn tag_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        rw_read(&self.tables, SOURCE, "tag_name_taken")
            .tags
            .values()
            .any(|t| t.name.eq_ignore_ascii_case(name) && t.id != except)
    }

    fn tag_slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        rw_read(&self.tables, SOURCE, "tag_slug_taken")
            .tags
            .values()
            .any(|t| t.slug.as_deref() == Some(slug) && t.id != except)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn new_tag(slug: &str) -> Tag {
        Tag {
            id: None,
            name: slug.to_uppercase(),
            slug: Some(slug.to_string()),
            description: None,
            created_at: None,
        }
    }

    fn new_post(author_id: i64, slug: &str, tags: Vec<Tag>) -> Post {
        Post {
            id: None,
            author_id,
            title: format!("Title {}", slug),
            content: "body".to_string(),
            slug: Some(slug.to_string()),
            status: PostStatus::Draft,
            tags,
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryRepository::new();
        let first = repo.insert_post(new_post(1, "a", Vec::new()));
        let second = repo.insert_post(new_post(1, "b", Vec::new()));

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(first.created_at.is_some());
        assert_eq!(repo.find_post_by_slug("b").unwrap().id, Some(2));
    }

    #[test]
    fn test_search_filters_and_pages() {
        let repo = InMemoryRepository::new();
        let rust = repo.insert_tag(new_tag("rust"));
        for i in 0..5 {
            let tags = if i % 2 == 0 { vec![rust.clone()] } else { Vec::new() };
            repo.insert_post(new_post(1, &format!("p{}", i), tags));
        }

        let query = PostListQuery {
            tag_slug: Some("rust".to_string()),
            ..PostListQuery::default()
        };
        let page = repo.search_posts(&query, 0, 2);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content.len(), 2);

        let last = repo.search_posts(&query, 1, 2);
        assert_eq!(last.content.len(), 1);
        assert_eq!(last.content[0].slug.as_deref(), Some("p4"));

        let beyond = repo.search_posts(&query, 9, 2);
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 3);
    }

    #[test]
    fn test_update_sets_published_at() {
        let repo = InMemoryRepository::new();
        let mut post = repo.insert_post(new_post(1, "a", Vec::new()));
        assert!(post.published_at.is_none());

        post.status = PostStatus::Published;
        let updated = repo.update_post(post).unwrap();
        assert!(updated.published_at.is_some());
    }

    #[test]
    fn test_update_unknown_post() {
        let repo = InMemoryRepository::new();
        let mut post = new_post(1, "a", Vec::new());
        post.id = Some(42);
        assert!(repo.update_post(post).is_none());
    }

    #[test]
    fn test_tag_changes_propagate_to_posts() {
        let repo = InMemoryRepository::new();
        let mut tag = repo.insert_tag(new_tag("rust"));
        let post = repo.insert_post(new_post(1, "a", vec![tag.clone()]));
        let post_id = post.id.unwrap();

        tag.slug = Some("rustlang".to_string());
        repo.update_tag(tag.clone()).unwrap();
        assert!(repo.find_post(post_id).unwrap().has_tag("rustlang"));

        assert!(repo.delete_tag(tag.id.unwrap()));
        assert!(repo.find_post(post_id).unwrap().tags.is_empty());
        assert!(!repo.delete_tag(tag.id.unwrap()));
    }

    #[test]
    fn test_uniqueness_checks() {
        let repo = InMemoryRepository::new();
        let tag = repo.insert_tag(new_tag("rust"));
        let post = repo.insert_post(new_post(1, "hello", Vec::new()));

        assert!(repo.tag_slug_taken("rust", None));
        assert!(!repo.tag_slug_taken("rust", tag.id));
        assert!(repo.tag_name_taken("rust", None));
        assert!(repo.post_slug_taken("hello", None));
        assert!(!repo.post_slug_taken("hello", post.id));
    }

    #[test]
    fn test_find_tags_skips_unknown_ids() {
        let repo = InMemoryRepository::new();
        let tag = repo.insert_tag(new_tag("rust"));
        let found = repo.find_tags(&[tag.id.unwrap(), 99]);
        assert_eq!(found.len(), 1);
    }
}
