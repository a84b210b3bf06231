//! Post source abstraction for postfeed.
//!
//! This module provides a pluggable data source that abstracts the remote
//! posts service (HTTP, mock for testing).
//!
//! # Design
//!
//! Every method is a single request against the remote feed and may fail
//! with a [`SourceError`]. The controller only recovers from errors for
//! which [`SourceError::is_transient`] is true; anything else is treated as
//! a fault and surfaced to the caller.
//!
//! # Example
//!
//! ```ignore
//! let source = MockPostSource::with_posts(vec![post]);
//! let posts = source.list().await?;
//! source.like(posts[0].id).await?;
//! ```

mod http;
mod mock;

pub use http::{
    HttpPostSource, HttpSourceConfig, DEFAULT_API_PREFIX, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT,
};
pub use mock::{MockCall, MockPostSource};

use async_trait::async_trait;
use feed_types::{Post, PostId};
use thiserror::Error;

/// Post source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request did not complete (connect, timeout, broken body).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request could not be built or encoded.
    #[error("encode error: {0}")]
    Encode(String),
}

impl SourceError {
    /// Whether this is a transient network failure.
    ///
    /// Only these are turned into a rollback (or an error screen for loads).
    /// Server-side 5xx responses count as transient; every other status and
    /// all encoding problems do not.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Status { status } => (500..600).contains(status),
            SourceError::Decode(_) | SourceError::Encode(_) => false,
        }
    }
}

/// Remote operations on the posts feed.
///
/// Implementations handle the underlying request mechanism
/// (HTTP, in-memory mock, etc).
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch every post, in server order.
    async fn list(&self) -> Result<Vec<Post>, SourceError>;

    /// Save a post. A post with [`PostId::NEW`] is created, others updated.
    async fn create(&self, post: Post) -> Result<(), SourceError>;

    /// Like a post on behalf of the current user.
    async fn like(&self, id: PostId) -> Result<(), SourceError>;

    /// Remove the current user's like from a post.
    async fn unlike(&self, id: PostId) -> Result<(), SourceError>;

    /// Delete a post.
    async fn delete(&self, id: PostId) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_transient() {
        assert!(SourceError::Network("connection refused".into()).is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(SourceError::Status { status: 500 }.is_transient());
        assert!(SourceError::Status { status: 503 }.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!SourceError::Status { status: 404 }.is_transient());
        assert!(!SourceError::Status { status: 400 }.is_transient());
    }

    #[test]
    fn codec_errors_are_not_transient() {
        assert!(!SourceError::Decode("expected value".into()).is_transient());
        assert!(!SourceError::Encode("bad url".into()).is_transient());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            SourceError::Status { status: 502 }.to_string(),
            "unexpected status 502"
        );
        assert_eq!(
            SourceError::Network("timed out".into()).to_string(),
            "network error: timed out"
        );
    }
}
