use actix_web::{HttpMessage, HttpRequest};

use crate::domain::error::ActionError;
use crate::presentation::middleware::RequestId;

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Only rejects segments that are not integers. Range checks belong to
/// the service, after its fault check.
pub fn parse_post_id(raw: &str) -> Result<i64, ActionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ActionError::InvalidPostId)
}
