//! Toggle the like on a post.

use anyhow::{Context, Result};
use feed_client::{FeedController, PostSource};
use feed_types::PostId;

use super::{format_post, load};

/// Run the like command.
pub async fn run<S: PostSource + 'static>(source: S, id: PostId) -> Result<()> {
    let controller = FeedController::new(source);
    load(&controller).await?;

    let task = controller
        .toggle_like(id)
        .with_context(|| format!("Cannot like post {id}"))?;
    if let Some(post) = controller.view_state().post(id) {
        println!("{}", format_post(post));
    }
    task.join().await?;

    match controller.view_state().post(id) {
        Some(post) => println!("Saved: {}", format_post(post)),
        None => println!("Post {id} is gone"),
    }
    Ok(())
}
