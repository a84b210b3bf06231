//! Feed state machine for postfeed.
//!
//! This module provides a pure, side-effect-free state machine for the feed
//! screen. It takes events as input and produces the next [`ViewState`] plus
//! a list of actions to execute.
//!
//! The actual I/O (calling the post source, publishing snapshots) is
//! performed by feed-client, not by this module.
//!
//! ```text
//! Idle ──LoadRequested──▶ Loading ──Loaded──▶ Settled
//!                            │                  │  ▲
//!                       LoadFailed   LikeToggled/Removed (optimistic)
//!                            ▼                  ▼  │ Restored (rollback)
//!                         Errored             Optimistic
//! ```

use feed_types::{Post, PostId};

use crate::ViewState;

/// Events that drive the feed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// User asked for a full reload.
    LoadRequested,
    /// User asked to refresh while keeping the current posts visible.
    RefreshRequested,
    /// The post source returned the full list.
    Loaded {
        /// Posts in server order.
        posts: Vec<Post>,
    },
    /// Listing posts failed with a transient error.
    LoadFailed,
    /// User toggled the like on a post.
    LikeToggled {
        /// The post to toggle.
        id: PostId,
    },
    /// User removed a post.
    Removed {
        /// The post to remove.
        id: PostId,
    },
    /// A remote call failed; go back to the snapshot taken before it.
    Restored {
        /// Snapshot captured before the optimistic change.
        snapshot: ViewState,
    },
}

/// Remote calls to be executed by feed-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fetch the full post list.
    FetchPosts,
    /// Record a like on the server.
    Like {
        /// Target post.
        id: PostId,
    },
    /// Remove a like on the server.
    Unlike {
        /// Target post.
        id: PostId,
    },
    /// Delete the post on the server.
    Delete {
        /// Target post.
        id: PostId,
    },
}

impl ViewState {
    /// Process an event and return the new state plus actions to execute.
    ///
    /// Toggling a like on an id that is not in the snapshot leaves the state
    /// untouched and produces no actions. Removing an unknown id still asks
    /// the server to delete it.
    pub fn on_event(self, event: FeedEvent) -> (Self, Vec<Action>) {
        match event {
            FeedEvent::LoadRequested => (Self::loading(), vec![Action::FetchPosts]),
            FeedEvent::RefreshRequested => {
                (Self::refreshing(self.posts), vec![Action::FetchPosts])
            }
            FeedEvent::Loaded { posts } => (Self::settled(posts), vec![]),
            FeedEvent::LoadFailed => (Self::errored(), vec![]),

            FeedEvent::LikeToggled { id } => {
                let Some(index) = self.posts.iter().position(|post| post.id == id) else {
                    return (self, vec![]);
                };
                let mut posts = self.posts.clone();
                posts[index] = posts[index].toggled_like();
                let action = if posts[index].liked_by_me {
                    Action::Like { id }
                } else {
                    Action::Unlike { id }
                };
                (self.with_posts(posts), vec![action])
            }

            FeedEvent::Removed { id } => {
                let posts = self
                    .posts
                    .iter()
                    .filter(|post| post.id != id)
                    .cloned()
                    .collect();
                (self.with_posts(posts), vec![Action::Delete { id }])
            }

            FeedEvent::Restored { snapshot } => (snapshot, vec![]),
        }
    }
}
