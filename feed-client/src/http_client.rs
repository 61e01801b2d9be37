use crate::FeedApi;
use crate::error::FeedClientError;
use crate::models::{
    Paginated, Post, PostsQuery, UserSearchQuery, UserSearchResult, decode_envelope, require_data,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct FeedClientHttp {
    client: Arc<Client>,
    base_url: String,
}

impl FeedClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, FeedClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Arc::new(Client::builder().build()?),
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, FeedClientError> {
    let status = resp.status().as_u16();
    let body = resp.bytes().await?;
    debug!(status, bytes = body.len(), "response received");
    decode_envelope(status, &body)
}

#[async_trait(?Send)]
impl FeedApi for FeedClientHttp {
    async fn list_posts(&self, query: &PostsQuery) -> Result<Paginated<Post>, FeedClientError> {
        let resp = self
            .client
            .get(self.url("/posts"))
            .query(&query.pairs())
            .send()
            .await?;
        require_data(read_envelope(resp).await?)
    }

    async fn get_post(&self, id: i64) -> Result<Post, FeedClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        require_data(read_envelope(resp).await?)
    }

    async fn search_users(
        &self,
        query: &UserSearchQuery,
    ) -> Result<Paginated<UserSearchResult>, FeedClientError> {
        let resp = self
            .client
            .get(self.url("/users/search"))
            .query(&query.pairs())
            .send()
            .await?;
        require_data(read_envelope(resp).await?)
    }

    async fn delete_post(&self, id: i64) -> Result<(), FeedClientError> {
        let resp = self
            .client
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        read_envelope::<serde_json::Value>(resp).await?;
        Ok(())
    }
}
