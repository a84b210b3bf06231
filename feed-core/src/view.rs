//! The snapshot the presentation layer renders.

use feed_types::{Post, PostId};

/// Immutable description of what the feed screen should show.
///
/// Only one of `loading`, `error`, or a settled list is meaningful at a
/// time. `empty` is authoritative only once `loading` and `error` are both
/// false. Snapshots are replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Posts in server order.
    pub posts: Vec<Post>,
    /// A full load is in flight.
    pub loading: bool,
    /// The last load failed; the screen should offer a retry.
    pub error: bool,
    /// The last completed load returned no posts.
    pub empty: bool,
    /// A refresh is in flight while the previous posts stay visible.
    pub refreshing: bool,
}

impl ViewState {
    /// State before anything has been requested.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A full load is in progress. Previous posts are not shown.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// The last load failed.
    pub fn errored() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    /// A completed load.
    pub fn settled(posts: Vec<Post>) -> Self {
        let empty = posts.is_empty();
        Self {
            posts,
            empty,
            ..Self::default()
        }
    }

    /// A refresh of `posts` is in progress.
    pub fn refreshing(posts: Vec<Post>) -> Self {
        Self {
            posts,
            refreshing: true,
            ..Self::default()
        }
    }

    /// Look up a post by id.
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Copy of this state with the post list replaced and all flags kept.
    pub fn with_posts(&self, posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..self.clone()
        }
    }
}
