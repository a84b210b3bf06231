//! Publish a new post.

use anyhow::{bail, Result};
use feed_client::{FeedController, PostSource};

/// Run the post command.
pub async fn run<S: PostSource + 'static>(source: S, text: &str) -> Result<()> {
    let controller = FeedController::new(source);

    controller.start_new_post();
    if !controller.update_draft_content(text) {
        bail!("Post content is empty");
    }

    submit(&controller).await?;
    println!("Published.");
    Ok(())
}

/// Submit the current draft and wait for the save to be confirmed.
pub async fn submit<S: PostSource + 'static>(controller: &FeedController<S>) -> Result<()> {
    let mut created = controller.post_created().subscribe()?;
    controller.submit_draft().join().await?;

    // The event fires inside the task, so it is pending by now unless the
    // save failed transiently.
    match created.try_recv() {
        Some(()) => Ok(()),
        None => bail!("The server did not confirm the save"),
    }
}
