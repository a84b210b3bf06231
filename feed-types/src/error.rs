//! Error types for postfeed.

use thiserror::Error;

use crate::PostId;

/// Errors reported by feed operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// No post with this id is in the current snapshot.
    #[error("post not found: {0}")]
    NotFound(PostId),

    /// The post source failed with an error the feed does not recover from.
    #[error("post source error: {0}")]
    Source(String),

    /// A background task ended without producing a result.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}
