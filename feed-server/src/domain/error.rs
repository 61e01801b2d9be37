use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures raised below the service boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(i64),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("[SIMULATED ERROR] Failed to {0}")]
    Simulated(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

/// What callers of the feed actions see. Messages are safe to show
/// verbatim; store details stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Failed to load posts. Please try again later.")]
    PostsLoadFailed,
    #[error("Failed to load post. Please try again later.")]
    PostLoadFailed,
    #[error("Failed to search users. Please try again later.")]
    UserSearchFailed,
    #[error("Invalid post ID")]
    InvalidPostId,
    #[error("Post not found")]
    PostNotFound,
    #[error("Post not found or already deleted")]
    PostAlreadyDeleted,
    #[error("Cannot delete post due to related data")]
    PostHasRelatedData,
    #[error("Failed to delete post. Please try again later.")]
    DeleteFailed,
}

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::InvalidPostId => StatusCode::BAD_REQUEST,
            ActionError::PostNotFound | ActionError::PostAlreadyDeleted => StatusCode::NOT_FOUND,
            ActionError::PostHasRelatedData => StatusCode::CONFLICT,
            ActionError::PostsLoadFailed
            | ActionError::PostLoadFailed
            | ActionError::UserSearchFailed
            | ActionError::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
