use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::FeedClientError;

/// Page size the user search asks for.
pub const SEARCH_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResult {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub post_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationState {
    /// First page of nothing.
    pub fn empty(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size,
            total_items: 0,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
}

impl<T> Paginated<T> {
    pub fn empty(page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationState::empty(page_size),
        }
    }
}

impl Paginated<UserSearchResult> {
    /// Result shown whenever no search is performed.
    pub fn no_search() -> Self {
        Self::empty(SEARCH_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub author_id: Option<i64>,
}

impl PostsQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize", size.to_string()));
        }
        if let Some(author) = self.author_id {
            pairs.push(("authorId", author.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearchQuery {
    pub query: String,
    pub page: u64,
    pub page_size: u64,
}

impl UserSearchQuery {
    pub fn first_page(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            page_size: SEARCH_PAGE_SIZE,
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Decodes a `{success, data | error}` body. `Ok(None)` is a success
/// without payload.
pub fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
) -> Result<Option<T>, FeedClientError> {
    let ok_status = (200..300).contains(&status);
    match serde_json::from_slice::<ActionResponse<T>>(body) {
        Ok(envelope) if envelope.success && ok_status => Ok(envelope.data),
        Ok(envelope) => Err(FeedClientError::from_status(status, envelope.error)),
        Err(e) if ok_status => Err(FeedClientError::InvalidResponse(e.to_string())),
        Err(_) => Err(FeedClientError::from_status(status, None)),
    }
}

pub fn require_data<T>(data: Option<T>) -> Result<T, FeedClientError> {
    data.ok_or_else(|| FeedClientError::InvalidResponse("missing data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_post_page() {
        let body = json!({
            "success": true,
            "data": {
                "items": [{
                    "id": 1,
                    "title": "t",
                    "body": "b",
                    "authorId": 2,
                    "author": { "id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "e@x" }
                }],
                "pagination": {
                    "page": 1, "pageSize": 8, "totalItems": 1, "totalPages": 1,
                    "hasNextPage": false, "hasPreviousPage": false
                }
            }
        });
        let bytes = serde_json::to_vec(&body).expect("bytes");

        let page: Paginated<Post> = decode_envelope(200, &bytes)
            .and_then(require_data)
            .expect("page");

        assert_eq!(page.items[0].author.name, "Ervin Howell");
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn failure_body_becomes_typed_error() {
        let bytes = serde_json::to_vec(&json!({
            "success": false,
            "error": "Post not found"
        }))
        .expect("bytes");

        let err = decode_envelope::<Post>(404, &bytes).expect_err("should fail");
        assert!(matches!(err, FeedClientError::NotFound(ref m) if m == "Post not found"));
    }

    #[test]
    fn empty_error_body_uses_status() {
        let err = decode_envelope::<Post>(500, b"").expect_err("should fail");
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn delete_success_has_no_data() {
        let data = decode_envelope::<serde_json::Value>(200, br#"{"success":true}"#).expect("ok");
        assert!(data.is_none());
    }

    #[test]
    fn posts_query_skips_missing_values() {
        let query = PostsQuery {
            page: Some(2),
            page_size: None,
            author_id: Some(5),
        };
        assert_eq!(
            query.pairs(),
            vec![("page", "2".to_string()), ("authorId", "5".to_string())]
        );
    }
}
