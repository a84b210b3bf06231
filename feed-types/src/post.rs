//! The post entity exchanged with the feed server.

use serde::{Deserialize, Serialize};

use crate::PostId;

/// A single entry of the feed.
///
/// Posts are plain values: every local change produces a new `Post` rather
/// than mutating one that a subscriber may already hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned identity ([`PostId::NEW`] until saved).
    pub id: PostId,
    /// Display name of the author.
    pub author: String,
    /// Body text.
    pub content: String,
    /// Publication time, as formatted by the server.
    pub published: String,
    /// Whether the current user has liked this post.
    pub liked_by_me: bool,
    /// Total number of likes.
    pub likes: u64,
}

impl Post {
    /// The blank post used as the "nothing being edited" draft.
    pub fn empty() -> Self {
        Self {
            id: PostId::NEW,
            author: String::new(),
            content: String::new(),
            published: String::new(),
            liked_by_me: false,
            likes: 0,
        }
    }

    /// Return a copy with the like flag flipped.
    ///
    /// `likes` moves by exactly one in the same direction as `liked_by_me`.
    pub fn toggled_like(&self) -> Self {
        let liked_by_me = !self.liked_by_me;
        let likes = if liked_by_me {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
        Self {
            liked_by_me,
            likes,
            ..self.clone()
        }
    }

    /// Return a copy with the content replaced.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::empty()
    }
}
