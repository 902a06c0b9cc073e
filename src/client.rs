//! Client for the remote post collection.
//!
//! Talks plain JSON over HTTP to a collection resource: `GET <base>?_limit=n`
//! lists, `POST <base>` creates, `PUT <base>/<id>` updates and
//! `DELETE <base>/<id>` removes. Every call is sent once; there are no retries.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::model::{Post, PostDraft, PostId};

const USER_AGENT: &str = concat!("post-board/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("remote returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Operations the controller needs from the remote collection.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch the first page of posts.
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError>;

    /// Create a post and return the remote representation, including its id.
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError>;

    /// Replace a post's title and body. The response body is ignored.
    async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<(), ClientError>;

    /// Delete a post. The response body is ignored.
    async fn delete_post(&self, id: &PostId) -> Result<(), ClientError>;
}

/// `reqwest`-backed [`PostsApi`].
#[derive(Clone)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
    page_limit: u32,
}

impl PostsClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: config.posts_api_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one post. The id is percent-encoded as a single path segment.
    fn item_url(&self, id: &PostId) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id.as_str()))
    }
}

/// Turn a non-success status into [`ClientError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    Err(ClientError::Status { status, body })
}

#[async_trait]
impl PostsApi for PostsClient {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        debug!(url = %self.base_url, limit = self.page_limit, "Listing posts");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("_limit", self.page_limit)])
            .send()
            .await
            .map_err(ClientError::Network)?;

        let posts: Vec<Post> = check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;

        debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(draft)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let post: Post = check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;

        debug!(post_id = %post.id, "Remote assigned post id");
        Ok(post)
    }

    async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .map_err(ClientError::Network)?;

        check_status(response).await?;
        debug!(post_id = %id, "Remote accepted update");
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(ClientError::Network)?;

        check_status(response).await?;
        debug!(post_id = %id, "Remote accepted delete");
        Ok(())
    }
}
