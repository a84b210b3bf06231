//! CLI command implementations.

pub mod edit;
pub mod like;
pub mod list;
pub mod post;
pub mod remove;

use anyhow::{bail, Result};
use feed_client::{FeedController, PostSource};
use feed_core::ViewState;
use feed_types::{Post, PostId};

/// Load the feed and return the settled snapshot.
///
/// Fails if the server could not be reached.
pub async fn load<S: PostSource + 'static>(controller: &FeedController<S>) -> Result<ViewState> {
    controller.load_feed().join().await?;
    let state = controller.view_state();
    if state.error {
        bail!("Could not load the feed, check that the server is reachable");
    }
    Ok(state)
}

/// One-line rendering of a post.
pub fn format_post(post: &Post) -> String {
    let heart = if post.liked_by_me { "♥" } else { "♡" };
    format!(
        "[{}] {} ({}) {} {}: {}",
        post.id, post.author, post.published, heart, post.likes, post.content
    )
}

/// Posts served by `--mock`.
pub fn demo_posts() -> Vec<Post> {
    [
        (3, "Netology", "21 May at 18:36", "Release notes for the new feed", 4, true),
        (2, "Netology", "20 May at 12:10", "Optimistic updates in practice", 11, false),
        (1, "Netology", "19 May at 09:00", "Hello, feed!", 0, false),
    ]
    .into_iter()
    .map(|(id, author, published, content, likes, liked_by_me)| Post {
        id: PostId::new(id),
        author: author.into(),
        content: content.into(),
        published: published.into(),
        liked_by_me,
        likes,
    })
    .collect()
}
