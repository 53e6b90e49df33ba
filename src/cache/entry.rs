//! Cache Entry Module
//!
//! Defines what the entity cache needs to know about a stored value.

// == Cache Entry ==
/// A value that can be indexed by the entity cache.
///
/// The cache never interprets values beyond these two accessors: the id keys
/// the primary index and the slug, when present, keys the secondary index.
pub trait CacheEntry {
    /// Primary key. `None` for entities that were never persisted.
    fn cache_id(&self) -> Option<i64>;

    /// Unique secondary key, if the entity has one.
    fn cache_slug(&self) -> Option<&str>;
}

impl<T: CacheEntry + ?Sized> CacheEntry for std::sync::Arc<T> {
    fn cache_id(&self) -> Option<i64> {
        (**self).cache_id()
    }

    fn cache_slug(&self) -> Option<&str> {
        (**self).cache_slug()
    }
}
