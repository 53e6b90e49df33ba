//! Service Module
//!
//! Post and tag services. Reads go through the caches first and fall back
//! to the repositories; writes go to the repositories and then refresh or
//! invalidate the caches.

mod post;
mod tag;

pub use post::PostService;
pub use tag::TagService;
