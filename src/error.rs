//! Error types for the blog backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the cache layer, services and handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// An entity without an id was handed to a cache; upstream invariant broken
    #[error("Cannot cache {0} without an id")]
    MissingId(&'static str),

    /// Post not found by id or slug
    #[error("Post not found: {0}")]
    PostNotFound(String),

    /// Tag not found by id or slug
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unique name or slug already taken
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::PostNotFound(_) | AppError::TagNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MissingId(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "message": self.to_string(),
            "data": null
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the blog backend.
pub type Result<T> = std::result::Result<T, AppError>;
