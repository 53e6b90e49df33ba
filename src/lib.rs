//! Blog Cache - an in-process caching layer for a blog backend
//!
//! Posts and tags are cached by id and by slug in two independently bounded
//! LRU indices, and paginated post listings are cached by query key until
//! the next write.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheManager, CacheStatistics};
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_stats_reporter;
