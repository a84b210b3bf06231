//! Identity types for postfeed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of a post.
///
/// Serialized as a bare JSON number. The value `0` is reserved for posts
/// that have not been saved yet.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Identity of a post that has not been saved to the server.
    pub const NEW: PostId = PostId(0);

    /// Create a PostId with the given value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this PostId.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether this id denotes an unsaved post.
    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}
