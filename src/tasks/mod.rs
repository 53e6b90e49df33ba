//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Statistics reporter: Logs a cache statistics snapshot at a configured interval

mod stats;

pub use stats::spawn_stats_reporter;
