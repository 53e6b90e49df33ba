//! List Result Cache Module
//!
//! Caches pages of filtered listing queries under a composite key built from
//! the filter values and the page coordinates.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::cache::lock::mutex_lock;

const SOURCE: &str = "cache::list";

/// Marker rendered for a filter that was not supplied.
pub const ANY_MARKER: &str = "all";

// == Cached Page ==
/// One cached page: the items in query order plus the unpaged total.
#[derive(Debug)]
pub struct CachedPage<V> {
    pub content: Vec<Arc<V>>,
    pub total_elements: u64,
}

impl<V> CachedPage<V> {
    pub fn new(content: Vec<Arc<V>>, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
        }
    }
}

// == List Key Builder ==
/// Builds deterministic list-cache keys.
///
/// Segments are joined with `:`. Absent values render as [`ANY_MARKER`];
/// text values are single-quoted with `\` and `'` escaped, so a filter value
/// containing `:` or equal to `all` never collides with another combination.
#[derive(Debug, Clone)]
pub struct ListKeyBuilder {
    key: String,
}

impl ListKeyBuilder {
    pub fn new(namespace: &str) -> Self {
        Self {
            key: namespace.to_string(),
        }
    }

    /// Appends a numeric or enum-like value that cannot contain `:` or `'`.
    pub fn value<T: Display>(mut self, value: Option<T>) -> Self {
        self.key.push(':');
        match value {
            Some(v) => self.key.push_str(&v.to_string()),
            None => self.key.push_str(ANY_MARKER),
        }
        self
    }

    /// Appends free-form text.
    pub fn text(mut self, value: Option<&str>) -> Self {
        self.key.push(':');
        match value {
            Some(v) => {
                self.key.push('\'');
                for c in v.chars() {
                    if c == '\\' || c == '\'' {
                        self.key.push('\\');
                    }
                    self.key.push(c);
                }
                self.key.push('\'');
            }
            None => self.key.push_str(ANY_MARKER),
        }
        self
    }

    /// Appends the page coordinates and returns the finished key.
    pub fn page(mut self, page: u32, size: u32) -> String {
        self.key.push_str(&format!(":{}:{}", page, size));
        self.key
    }
}

// == List Result Cache ==
#[derive(Debug)]
struct ListInner<V> {
    pages: HashMap<String, Arc<CachedPage<V>>>,
    /// Insertion order, oldest first; drives eviction
    arrival: VecDeque<String>,
}

/// Bounded cache of listing pages.
///
/// Not access-ordered: when full, the oldest inserted key is evicted, which is
/// deterministic for a fixed insertion history. Any write to the underlying
/// entities must call [`ListResultCache::invalidate_all`], since filters make
/// selective invalidation impossible.
#[derive(Debug)]
pub struct ListResultCache<V> {
    inner: Mutex<ListInner<V>>,
    capacity: usize,
}

impl<V> ListResultCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ListInner {
                pages: HashMap::new(),
                arrival: VecDeque::new(),
            }),
            capacity,
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<Arc<CachedPage<V>>> {
        mutex_lock(&self.inner, SOURCE, "get").pages.get(key).cloned()
    }

    // == Put ==
    /// Stores a page. Overwriting an existing key keeps its arrival slot;
    /// a new key at capacity evicts the oldest arrival first. With zero
    /// capacity nothing is stored.
    pub fn put(&self, key: impl Into<String>, content: Vec<Arc<V>>, total_elements: u64) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        let page = Arc::new(CachedPage::new(content, total_elements));

        let mut inner = mutex_lock(&self.inner, SOURCE, "put");
        if let Some(slot) = inner.pages.get_mut(&key) {
            *slot = page;
            return;
        }
        while inner.pages.len() >= self.capacity {
            let Some(oldest) = inner.arrival.pop_front() else {
                break;
            };
            inner.pages.remove(&oldest);
            debug!(evicted = %oldest, "Evicted list cache entry");
        }
        inner.arrival.push_back(key.clone());
        inner.pages.insert(key, page);
    }

    // == Invalidate All ==
    pub fn invalidate_all(&self) {
        let mut inner = mutex_lock(&self.inner, SOURCE, "invalidate_all");
        inner.pages.clear();
        inner.arrival.clear();
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.inner, SOURCE, "len").pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn page(values: &[i32]) -> Vec<Arc<i32>> {
        values.iter().copied().map(Arc::new).collect()
    }

    fn key(tag: Option<&str>, search: Option<&str>) -> String {
        ListKeyBuilder::new("posts")
            .value(None::<i64>)
            .text(tag)
            .text(search)
            .page(0, 20)
    }

    #[test]
    fn test_key_uses_marker_for_missing_filters() {
        let key = ListKeyBuilder::new("posts")
            .value(None::<i64>)
            .text(None)
            .page(2, 10);
        assert_eq!(key, "posts:all:all:2:10");
    }

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(key(Some("rust"), None), key(Some("rust"), None));
        assert_ne!(key(Some("rust"), None), key(None, Some("rust")));
    }

    #[test]
    fn test_key_literal_all_differs_from_missing() {
        assert_ne!(key(Some("all"), None), key(None, None));
    }

    #[test]
    fn test_key_colons_cannot_shift_fields() {
        assert_ne!(key(Some("a:b"), Some("c")), key(Some("a"), Some("b:c")));
    }

    #[test]
    fn test_key_escapes_quotes() {
        assert_ne!(key(Some("a'"), Some("b")), key(Some("a"), Some("'b")));
        let key = ListKeyBuilder::new("x").text(Some("it's")).page(0, 1);
        assert_eq!(key, "x:'it\\'s':0:1");
    }

    #[test]
    fn test_put_and_get() {
        let cache = ListResultCache::new(4);
        cache.put("k", page(&[1, 2]), 7);

        let cached = cache.get("k").unwrap();
        assert_eq!(cached.content.len(), 2);
        assert_eq!(*cached.content[0], 1);
        assert_eq!(cached.total_elements, 7);
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_put_at_capacity_evicts_oldest_arrival() {
        let cache = ListResultCache::new(2);
        cache.put("a", page(&[1]), 1);
        cache.put("b", page(&[2]), 1);
        // Reads do not refresh list entries
        cache.get("a");
        cache.put("c", page(&[3]), 1);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = ListResultCache::new(2);
        cache.put("a", page(&[1]), 1);
        cache.put("b", page(&[2]), 1);
        cache.put("a", page(&[9]), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().total_elements, 3);
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ListResultCache::new(0);
        cache.put("a", page(&[1]), 1);
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_invalidate_all_clears_everything() {
        let cache = ListResultCache::new(10);
        let keys: Vec<String> = (0..5).map(|i| format!("k{}", i)).collect();
        for k in &keys {
            cache.put(k.clone(), page(&[1]), 1);
        }

        cache.invalidate_all();

        assert!(cache.is_empty());
        for k in &keys {
            assert!(cache.get(k).is_none());
        }
        // Still usable after invalidation
        cache.put("fresh", page(&[1]), 1);
        assert_eq!(cache.len(), 1);
    }
}
