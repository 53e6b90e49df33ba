//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{
    DEFAULT_POST_CACHE_SIZE, DEFAULT_POST_LIST_CACHE_SIZE, DEFAULT_POST_SLUG_CACHE_SIZE,
    DEFAULT_TAG_CACHE_SIZE,
};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Capacity of the post id index
    pub post_cache_size: usize,
    /// Capacity of the post slug index
    pub post_slug_cache_size: usize,
    /// Capacity of each tag index
    pub tag_cache_size: usize,
    /// Maximum cached post list pages
    pub post_list_cache_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between statistics log lines, 0 disables
    pub stats_log_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POST_CACHE_SIZE` - Post id index capacity (default: 100)
    /// - `POST_SLUG_CACHE_SIZE` - Post slug index capacity (default: 100)
    /// - `TAG_CACHE_SIZE` - Tag index capacity (default: 50)
    /// - `POST_LIST_CACHE_SIZE` - Cached post list pages (default: 20)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `STATS_LOG_INTERVAL` - Statistics log interval in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            post_cache_size: env_or("POST_CACHE_SIZE", defaults.post_cache_size),
            post_slug_cache_size: env_or("POST_SLUG_CACHE_SIZE", defaults.post_slug_cache_size),
            tag_cache_size: env_or("TAG_CACHE_SIZE", defaults.tag_cache_size),
            post_list_cache_size: env_or("POST_LIST_CACHE_SIZE", defaults.post_list_cache_size),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            stats_log_interval: env_or("STATS_LOG_INTERVAL", defaults.stats_log_interval),
        }
    }
}

/// Parses `name`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            post_cache_size: DEFAULT_POST_CACHE_SIZE,
            post_slug_cache_size: DEFAULT_POST_SLUG_CACHE_SIZE,
            tag_cache_size: DEFAULT_TAG_CACHE_SIZE,
            post_list_cache_size: DEFAULT_POST_LIST_CACHE_SIZE,
            server_port: 8080,
            stats_log_interval: 60,
        }
    }
}
