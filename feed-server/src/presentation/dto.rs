use crate::application::post_service::PostsQuery;
use crate::application::user_service::UserSearchQuery;
use serde::{Deserialize, Serialize};

// ======================= Envelope =======================

/// `{"success": true, "data": ...}`; failures are rendered by
/// [`crate::domain::error::ActionError`].
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl ActionResponse<()> {
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

// ======================= POSTS =======================

/// Query values stay strings so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    #[serde(alias = "userId")]
    pub author_id: Option<String>,
}

impl From<ListPostsQuery> for PostsQuery {
    fn from(query: ListPostsQuery) -> Self {
        PostsQuery {
            page: lenient_int(query.page.as_deref()),
            page_size: lenient_int(query.page_size.as_deref()),
            author_id: lenient_int(query.author_id.as_deref()),
        }
    }
}

// ======================= USERS =======================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchUsersQuery {
    #[serde(alias = "q")]
    pub query: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl From<SearchUsersQuery> for UserSearchQuery {
    fn from(query: SearchUsersQuery) -> Self {
        UserSearchQuery {
            query: query.query,
            page: lenient_int(query.page.as_deref()),
            page_size: lenient_int(query.page_size.as_deref()),
        }
    }
}

// ======================= Utils =======================

pub fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
