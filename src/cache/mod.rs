//! Cache Module
//!
//! In-process caches in front of the post and tag stores: LRU point-lookup
//! caches indexed by id and slug, and a list-result cache for filtered pages.

mod entity;
mod entry;
mod list;
pub(crate) mod lock;
mod lru;
mod manager;
mod stats;


// Re-export public types
pub use entity::EntityCache;
pub use entry::CacheEntry;
pub use list::{CachedPage, ListKeyBuilder, ListResultCache, ANY_MARKER};
pub use lru::LruMap;
pub use manager::CacheManager;
pub use stats::{hit_rate, CacheStatistics, EntityStats, HitCounter};

// == Default Capacities ==
pub const DEFAULT_POST_CACHE_SIZE: usize = 100;
pub const DEFAULT_POST_SLUG_CACHE_SIZE: usize = 100;
pub const DEFAULT_TAG_CACHE_SIZE: usize = 50;
pub const DEFAULT_POST_LIST_CACHE_SIZE: usize = 20;
