//! Logical listing filters.
//!
//! A filter is built once per request and handed to both the row query and
//! the count query, so the total and the rows always share one predicate.

#[cfg(test)]
use crate::domain::post::Post;
#[cfg(test)]
use crate::domain::user::UserSearchResult;

/// Shortest query text that triggers a user search.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(i64),
}

impl PostFilter {
    /// Non-positive ids mean no author constraint.
    pub fn for_author(author_id: Option<i64>) -> Self {
        match author_id {
            Some(id) if id > 0 => PostFilter::Author(id),
            _ => PostFilter::All,
        }
    }

    #[cfg(test)]
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Author(id) => post.author_id == *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Case-sensitive substring match on name OR username.
    NameOrUsernameContains(String),
}

impl UserFilter {
    /// Returns `None` when the text is too short to search for.
    pub fn for_query(query: Option<&str>) -> Option<Self> {
        let text = query.map(str::trim).unwrap_or_default();
        if text.chars().count() < MIN_QUERY_CHARS {
            return None;
        }
        Some(UserFilter::NameOrUsernameContains(text.to_owned()))
    }

    pub fn text(&self) -> &str {
        match self {
            UserFilter::NameOrUsernameContains(text) => text,
        }
    }

    #[cfg(test)]
    pub fn matches(&self, name: &str, username: &str) -> bool {
        let text = self.text();
        name.contains(text) || username.contains(text)
    }

    #[cfg(test)]
    pub fn matches_result(&self, user: &UserSearchResult) -> bool {
        self.matches(&user.name, &user.username)
    }
}
