//! Statistics Reporter Task
//!
//! Background task that periodically logs a cache statistics snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::CacheManager;

/// Spawns a background task that logs `CacheManager::statistics` every
/// `interval_secs` seconds.
///
/// Returns `None` without spawning anything when `interval_secs` is 0.
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheManager::default());
/// let reporter = spawn_stats_reporter(cache.clone(), 60);
/// // Later, during shutdown:
/// if let Some(handle) = reporter {
///     handle.abort();
/// }
/// ```
pub fn spawn_stats_reporter(
    cache: Arc<CacheManager>,
    interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Statistics reporter disabled");
        return None;
    }
    let period = Duration::from_secs(interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting statistics reporter with interval of {} seconds",
            interval_secs
        );

        let mut ticker = tokio::time::interval(period);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let stats = cache.statistics();
            info!(
                post_entries = stats.post_cache_size,
                post_slug_entries = stats.post_slug_cache_size,
                tag_entries = stats.tag_cache_size,
                tag_slug_entries = stats.tag_slug_cache_size,
                post_list_entries = stats.post_list_cache_size,
                post_hits = stats.post_cache_hits,
                post_misses = stats.post_cache_misses,
                tag_hits = stats.tag_cache_hits,
                tag_misses = stats.tag_cache_misses,
                hit_rate = stats.hit_rate,
                "Cache statistics"
            );
        }
    }))
}
