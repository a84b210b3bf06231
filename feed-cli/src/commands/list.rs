//! Show the feed.

use anyhow::Result;
use feed_client::{FeedController, PostSource};

use super::{format_post, load};

/// Run the list command.
pub async fn run<S: PostSource + 'static>(source: S) -> Result<()> {
    let controller = FeedController::new(source);
    let state = load(&controller).await?;

    if state.empty {
        println!("No posts yet.");
        return Ok(());
    }

    for post in &state.posts {
        println!("{}", format_post(post));
    }
    Ok(())
}
