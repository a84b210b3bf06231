//! HTTP post source.
//!
//! Talks JSON to the posts API:
//!
//! | Call       | Request                              | Body          |
//! |------------|--------------------------------------|---------------|
//! | `list`     | `GET    {base}{prefix}/posts`        | -             |
//! | `create`   | `POST   {base}{prefix}/posts`        | post          |
//! | `like`     | `POST   {base}{prefix}/posts/{id}/likes`   | bare id |
//! | `unlike`   | `DELETE {base}{prefix}/posts/{id}/likes`   | bare id |
//! | `delete`   | `DELETE {base}{prefix}/posts/{id}`   | -             |

use super::{PostSource, SourceError};
use async_trait::async_trait;
use feed_types::{Post, PostId};
use std::time::Duration;

/// Default server address (the host machine, seen from an Android emulator).
pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2:9999";

/// Default path prefix of the posts API.
pub const DEFAULT_API_PREFIX: &str = "/api/slow";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpPostSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Scheme, host and port of the server.
    pub base_url: String,
    /// Path prefix in front of `/posts`.
    pub api_prefix: String,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
}

impl HttpSourceConfig {
    /// Create a configuration for the given server with default prefix and timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Set the API path prefix.
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.to_string();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            SourceError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            SourceError::Decode(e.to_string())
        } else if e.is_builder() {
            SourceError::Encode(e.to_string())
        } else {
            SourceError::Network(e.to_string())
        }
    }
}

/// Post source backed by the remote posts API.
#[derive(Debug, Clone)]
pub struct HttpPostSource {
    client: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpPostSource {
    /// Create a source for the configured server.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration this source was built with.
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_prefix,
            path
        )
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn list(&self) -> Result<Vec<Post>, SourceError> {
        let response = self
            .client
            .get(self.url("/posts"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create(&self, post: Post) -> Result<(), SourceError> {
        self.client
            .post(self.url("/posts"))
            .json(&post)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn like(&self, id: PostId) -> Result<(), SourceError> {
        self.client
            .post(self.url(&format!("/posts/{id}/likes")))
            .json(&id)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn unlike(&self, id: PostId) -> Result<(), SourceError> {
        self.client
            .delete(self.url(&format!("/posts/{id}/likes")))
            .json(&id)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), SourceError> {
        self.client
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
