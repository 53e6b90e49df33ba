//! Entity Cache Module
//!
//! Point-lookup cache for one entity type, indexed by id and by slug.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::cache::lock::mutex_lock;
use crate::cache::stats::{EntityStats, HitCounter};
use crate::cache::{CacheEntry, LruMap};
use crate::error::{AppError, Result};

const SOURCE: &str = "cache::entity";

// == Entity Cache ==
/// Bounded, thread-safe LRU cache with a primary id index and a secondary
/// slug index over the same shared values.
///
/// The two indices are bounded and aged independently, so an entity can be
/// present under its id after its slug entry was evicted (or the reverse).
/// That drift is accepted: a lookup that misses one index simply falls back
/// to the store. Each index sits behind its own lock and no operation holds
/// both at once.
#[derive(Debug)]
pub struct EntityCache<V> {
    /// Label used in logs and errors
    name: &'static str,
    by_id: Mutex<LruMap<i64, Arc<V>>>,
    by_slug: Mutex<LruMap<String, Arc<V>>>,
    /// Hits and misses across both indices
    counter: HitCounter,
}

impl<V: CacheEntry> EntityCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `name` - Entity label for logs (e.g. "post")
    /// * `id_capacity` - Maximum entries in the id index
    /// * `slug_capacity` - Maximum entries in the slug index
    pub fn new(name: &'static str, id_capacity: usize, slug_capacity: usize) -> Self {
        Self {
            name,
            by_id: Mutex::new(LruMap::new(id_capacity)),
            by_slug: Mutex::new(LruMap::new(slug_capacity)),
            counter: HitCounter::new(),
        }
    }

    // == Get By Id ==
    /// Looks up an entity by id, refreshing its recency on a hit.
    pub fn get_by_id(&self, id: i64) -> Option<Arc<V>> {
        let found = mutex_lock(&self.by_id, SOURCE, "get_by_id").get(&id).cloned();
        self.record(found.is_some());
        found
    }

    // == Get By Slug ==
    /// Looks up an entity by slug, refreshing its recency on a hit.
    pub fn get_by_slug(&self, slug: &str) -> Option<Arc<V>> {
        let found = mutex_lock(&self.by_slug, SOURCE, "get_by_slug")
            .get(slug)
            .cloned();
        self.record(found.is_some());
        found
    }

    // == Put ==
    /// Inserts or overwrites an entity in the id index and, when it has a
    /// slug, in the slug index.
    ///
    /// Any other slug entry still pointing at this id is dropped, so a
    /// renamed entity is never served under its old slug. When the previous
    /// version is still in the id index its slug is removed directly;
    /// otherwise the slug index is scanned, which is linear in its capacity.
    ///
    /// # Errors
    /// `AppError::MissingId` if the entity has no id.
    pub fn put(&self, value: impl Into<Arc<V>>) -> Result<()> {
        let value = value.into();
        let id = value.cache_id().ok_or(AppError::MissingId(self.name))?;

        // None when the id was not cached, Some(slug) with the old slug otherwise
        let previous = {
            let mut by_id = mutex_lock(&self.by_id, SOURCE, "put");
            let previous = by_id
                .peek(&id)
                .map(|old| old.cache_slug().map(str::to_owned));
            if let Some((evicted, _)) = by_id.insert(id, Arc::clone(&value)) {
                debug!(cache = self.name, index = "id", evicted, "Evicted LRU entry");
            }
            previous
        };

        let new_slug = value.cache_slug();
        let mut by_slug = mutex_lock(&self.by_slug, SOURCE, "put");
        match previous {
            Some(Some(old)) => {
                let renamed = new_slug != Some(old.as_str());
                let still_ours =
                    by_slug.peek(old.as_str()).and_then(|v| v.cache_id()) == Some(id);
                if renamed && still_ours {
                    by_slug.remove(old.as_str());
                }
            }
            Some(None) => {}
            None => {
                let stale = by_slug.remove_first_where(|slug, v| {
                    v.cache_id() == Some(id) && Some(slug.as_str()) != new_slug
                });
                if let Some((slug, _)) = stale {
                    debug!(cache = self.name, %slug, "Dropped stale slug entry");
                }
            }
        }
        if let Some(slug) = value.cache_slug() {
            if let Some((evicted, _)) = by_slug.insert(slug.to_owned(), Arc::clone(&value)) {
                debug!(cache = self.name, index = "slug", %evicted, "Evicted LRU entry");
            }
        }
        Ok(())
    }

    // == Remove ==
    /// Removes an entity from both indices.
    ///
    /// The slug entry is removed directly when the removed value names it and
    /// the entry still belongs to this id. Otherwise (id already evicted, no
    /// slug, or a stale slug) the slug index is scanned for the first entry
    /// whose value carries this id. The scan is linear in the slug capacity.
    pub fn remove(&self, id: i64) {
        let removed = mutex_lock(&self.by_id, SOURCE, "remove").remove(&id);

        let mut by_slug = mutex_lock(&self.by_slug, SOURCE, "remove");
        let known_slug = removed
            .as_ref()
            .and_then(|v| v.cache_slug())
            .filter(|slug| by_slug.peek(*slug).and_then(|v| v.cache_id()) == Some(id))
            .map(str::to_owned);

        match known_slug {
            Some(slug) => {
                by_slug.remove(slug.as_str());
            }
            None => {
                by_slug.remove_first_where(|_, v| v.cache_id() == Some(id));
            }
        }
    }

    // == Clear ==
    /// Empties both indices. Statistics are left untouched.
    pub fn clear(&self) {
        mutex_lock(&self.by_id, SOURCE, "clear").clear();
        mutex_lock(&self.by_slug, SOURCE, "clear").clear();
    }

    // == Statistics ==
    pub fn statistics(&self) -> EntityStats {
        EntityStats {
            hits: self.counter.hits(),
            misses: self.counter.misses(),
            id_entries: self.id_len(),
            slug_entries: self.slug_len(),
        }
    }

    pub fn id_len(&self) -> usize {
        mutex_lock(&self.by_id, SOURCE, "id_len").len()
    }

    pub fn slug_len(&self) -> usize {
        mutex_lock(&self.by_slug, SOURCE, "slug_len").len()
    }

    fn record(&self, hit: bool) {
        if hit {
            self.counter.record_hit();
        } else {
            self.counter.record_miss();
        }
    }
}
