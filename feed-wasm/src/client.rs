use async_trait::async_trait;
use feed_client::FeedApi;
use feed_client::error::FeedClientError;
use feed_client::models::{
    decode_envelope, require_data, Paginated, Post, PostsQuery, UserSearchQuery, UserSearchResult,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

#[derive(Clone, PartialEq)]
pub struct FeedClientWeb {
    base_url: String,
}

impl FeedClientWeb {
    pub fn new(endpoint: &str) -> Self {
        Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

fn transport(err: gloo_net::Error) -> FeedClientError {
    FeedClientError::Transport(err.to_string())
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Option<T>, FeedClientError> {
    let status = response.status();
    let body = response.binary().await.map_err(transport)?;
    decode_envelope(status, &body)
}

#[async_trait(?Send)]
impl FeedApi for FeedClientWeb {
    async fn list_posts(&self, query: &PostsQuery) -> Result<Paginated<Post>, FeedClientError> {
        let response = Request::get(&self.url("/posts"))
            .query(query.pairs())
            .send()
            .await
            .map_err(transport)?;
        require_data(read_envelope(response).await?)
    }

    async fn get_post(&self, id: i64) -> Result<Post, FeedClientError> {
        let response = Request::get(&self.url(&format!("/posts/{id}")))
            .send()
            .await
            .map_err(transport)?;
        require_data(read_envelope(response).await?)
    }

    async fn search_users(
        &self,
        query: &UserSearchQuery,
    ) -> Result<Paginated<UserSearchResult>, FeedClientError> {
        let response = Request::get(&self.url("/users/search"))
            .query(query.pairs())
            .send()
            .await
            .map_err(transport)?;
        require_data(read_envelope(response).await?)
    }

    async fn delete_post(&self, id: i64) -> Result<(), FeedClientError> {
        let response = Request::delete(&self.url(&format!("/posts/{id}")))
            .send()
            .await
            .map_err(transport)?;
        read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}
