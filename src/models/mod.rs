//! Request and Response models for the blog API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CreatePostRequest, PageParams, PostListParams, TagRequest, UpdatePostRequest,
};
pub use responses::{ApiResponse, HealthResponse, PageDto, PostDto, TagDto, TagSummaryDto};
