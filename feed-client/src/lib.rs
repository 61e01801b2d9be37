use crate::error::FeedClientError;
use crate::models::{Paginated, Post, PostsQuery, UserSearchQuery, UserSearchResult};
use async_trait::async_trait;

pub mod error;
#[cfg(feature = "http")]
pub mod http_client;
pub mod listing;
pub mod models;
pub mod page_window;
pub mod search;

/// Operations the feed API offers, whatever the transport.
#[async_trait(?Send)]
pub trait FeedApi {
    async fn list_posts(&self, query: &PostsQuery) -> Result<Paginated<Post>, FeedClientError>;
    async fn get_post(&self, id: i64) -> Result<Post, FeedClientError>;
    async fn search_users(
        &self,
        query: &UserSearchQuery,
    ) -> Result<Paginated<UserSearchResult>, FeedClientError>;
    async fn delete_post(&self, id: i64) -> Result<(), FeedClientError>;
}
