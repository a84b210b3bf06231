//! Change the content of a post.

use anyhow::{Context, Result};
use feed_client::{FeedController, PostSource};
use feed_types::PostId;

use super::{load, post::submit};

/// Run the edit command.
pub async fn run<S: PostSource + 'static>(source: S, id: PostId, text: &str) -> Result<()> {
    let controller = FeedController::new(source);
    let state = load(&controller).await?;

    let original = state
        .post(id)
        .cloned()
        .with_context(|| format!("Post {id} is not in the feed"))?;

    controller.start_edit(original);
    if !controller.update_draft_content(text) {
        println!("Post {id} unchanged.");
        controller.start_new_post();
        return Ok(());
    }

    submit(&controller).await?;
    println!("Updated post {id}.");
    Ok(())
}
