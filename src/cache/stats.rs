//! Cache Statistics Module
//!
//! Live hit/miss counters for point lookups and the snapshots read from them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Hit Counter ==
/// Monotonic hit/miss counters shared by every lookup path of one cache.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

// == Hit Rate ==
/// hits / (hits + misses), or 0.0 when nothing has been looked up.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Entity Stats ==
/// Point-in-time view of one entity cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    /// Lookups answered from either index
    pub hits: u64,
    /// Lookups that fell through to the store
    pub misses: u64,
    /// Entries in the id index
    pub id_entries: usize,
    /// Entries in the slug index
    pub slug_entries: usize,
}

impl EntityStats {
    pub fn hit_rate(&self) -> f64 {
        hit_rate(self.hits, self.misses)
    }
}

// == Cache Statistics ==
/// Snapshot across every cache owned by the manager, as served to operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatistics {
    pub post_cache_size: usize,
    pub post_slug_cache_size: usize,
    pub tag_cache_size: usize,
    pub tag_slug_cache_size: usize,
    pub post_list_cache_size: usize,
    pub post_cache_hits: u64,
    pub post_cache_misses: u64,
    pub tag_cache_hits: u64,
    pub tag_cache_misses: u64,
    /// Post lookup hit rate
    pub hit_rate: f64,
}

impl CacheStatistics {
    pub fn new(posts: EntityStats, tags: EntityStats, post_lists: usize) -> Self {
        Self {
            post_cache_size: posts.id_entries,
            post_slug_cache_size: posts.slug_entries,
            tag_cache_size: tags.id_entries,
            tag_slug_cache_size: tags.slug_entries,
            post_list_cache_size: post_lists,
            post_cache_hits: posts.hits,
            post_cache_misses: posts.misses,
            tag_cache_hits: tags.hits,
            tag_cache_misses: tags.misses,
            hit_rate: posts.hit_rate(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_new() {
        let counter = HitCounter::new();
        assert_eq!(counter.hits(), 0);
        assert_eq!(counter.misses(), 0);
    }

    #[test]
    fn test_counter_records() {
        let counter = HitCounter::new();
        counter.record_hit();
        counter.record_hit();
        counter.record_miss();
        assert_eq!(counter.hits(), 2);
        assert_eq!(counter.misses(), 1);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(hit_rate(0, 0), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        assert_eq!(hit_rate(3, 0), 1.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        assert_eq!(hit_rate(0, 2), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = EntityStats {
            hits: 1,
            misses: 1,
            ..EntityStats::default()
        };
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_statistics_from_entity_stats() {
        let posts = EntityStats {
            hits: 2,
            misses: 1,
            id_entries: 3,
            slug_entries: 2,
        };
        let tags = EntityStats {
            hits: 0,
            misses: 4,
            id_entries: 1,
            slug_entries: 1,
        };
        let stats = CacheStatistics::new(posts, tags, 5);

        assert_eq!(stats.post_cache_size, 3);
        assert_eq!(stats.post_slug_cache_size, 2);
        assert_eq!(stats.tag_cache_size, 1);
        assert_eq!(stats.post_list_cache_size, 5);
        assert_eq!(stats.tag_cache_misses, 4);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_serialize_camel_case() {
        let json = serde_json::to_value(CacheStatistics::default()).unwrap();
        assert!(json.get("postCacheSize").is_some());
        assert!(json.get("postListCacheSize").is_some());
        assert!(json.get("hitRate").is_some());
    }
}
