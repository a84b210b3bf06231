//! Delete a post.

use anyhow::Result;
use feed_client::{FeedController, PostSource};
use feed_types::PostId;

use super::load;

/// Run the remove command.
pub async fn run<S: PostSource + 'static>(source: S, id: PostId) -> Result<()> {
    let controller = FeedController::new(source);
    let before = load(&controller).await?;
    if before.post(id).is_none() {
        tracing::warn!("Post {} is not in the feed, deleting anyway", id);
    }

    controller.remove_by_id(id).join().await?;

    let after = controller.view_state();
    if after.post(id).is_some() {
        println!("Could not delete post {id}, it was restored");
    } else {
        println!("Deleted post {id} ({} left)", after.posts.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::demo_posts;
    use feed_client::{MockCall, MockPostSource, SourceError};

    #[tokio::test]
    async fn remove_deletes_on_server() {
        let source = MockPostSource::with_posts(demo_posts());
        run(source.clone(), PostId::new(1)).await.unwrap();

        assert!(source.calls().contains(&MockCall::Delete(PostId::new(1))));
        assert_eq!(source.posts().len(), 2);
    }

    #[tokio::test]
    async fn remove_transient_failure_is_not_an_error() {
        let source = MockPostSource::with_posts(demo_posts());
        source.fail_next_delete(SourceError::Network("timed out".into()));

        assert!(run(source.clone(), PostId::new(1)).await.is_ok());
        assert_eq!(source.posts().len(), 3);
    }

    #[tokio::test]
    async fn remove_unknown_post_still_sends_delete() {
        let source = MockPostSource::with_posts(demo_posts());
        run(source.clone(), PostId::new(42)).await.unwrap();

        assert!(source.calls().contains(&MockCall::Delete(PostId::new(42))));
    }
}
