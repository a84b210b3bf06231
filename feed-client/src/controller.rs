//! FeedController - the main interface for postfeed.
//!
//! This module provides [`FeedController`], which owns the feed snapshot and
//! the draft being edited, and keeps them in step with a [`PostSource`].
//!
//! # Architecture
//!
//! The controller runs every intent through the pure feed state machine
//! (from feed-core), publishes the resulting snapshot, and interprets the
//! returned actions as background tasks against the post source.
//!
//! ```text
//! UI intent → FeedController → ViewState::on_event → publish snapshot
//!                    ↓
//!             background task → PostSource → confirm / roll back
//! ```
//!
//! # Delivery
//!
//! Snapshots are published on a `watch` channel: readers always see the
//! latest value, intermediate values may be skipped, and publishing with no
//! subscriber attached is fine. Dropping a receiver unsubscribes it.
//!
//! Like and delete are optimistic. The snapshot is changed before the
//! request is sent and, if the request fails with a transient error, the
//! whole snapshot captured before the change is published again. Two
//! overlapping optimistic operations are not serialized, so a rollback can
//! undo a concurrent, successful change to another post.
//!
//! # Example
//!
//! ```ignore
//! use feed_client::{FeedController, MockPostSource};
//!
//! let controller = FeedController::new(MockPostSource::new());
//! let mut feed = controller.subscribe();
//!
//! controller.load_feed();
//! feed.changed().await?;
//! render(&*feed.borrow());
//! ```

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use feed_core::{draft, Action, FeedEvent, ViewState};
use feed_types::{FeedError, Post, PostId};

use crate::event::OneShotEvent;
use crate::source::{PostSource, SourceError};

/// Handle to the background work started by a controller operation.
///
/// Dropping it lets the work run to completion unobserved.
#[derive(Debug)]
pub struct FeedTask {
    handle: JoinHandle<Result<(), FeedError>>,
}

impl FeedTask {
    /// Wait for the background work to finish.
    ///
    /// Returns the error of a failure the controller did not recover from.
    pub async fn join(self) -> Result<(), FeedError> {
        self.handle
            .await
            .map_err(|e| FeedError::TaskFailed(e.to_string()))?
    }

    /// Check whether the background work has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Owns the feed snapshot and draft and syncs them with a post source.
pub struct FeedController<S: PostSource + 'static> {
    source: Arc<S>,
    state: Arc<watch::Sender<ViewState>>,
    draft: watch::Sender<Post>,
    post_created: OneShotEvent<()>,
    runtime: Handle,
}

impl<S: PostSource + 'static> FeedController<S> {
    /// Create a controller that runs background work on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime. Use
    /// [`with_runtime`](Self::with_runtime) to pass a handle explicitly.
    pub fn new(source: S) -> Self {
        Self::with_runtime(source, Handle::current())
    }

    /// Create a controller that runs background work on the given runtime.
    ///
    /// Operations may then be called from any thread.
    pub fn with_runtime(source: S, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ViewState::idle());
        let (draft, _) = watch::channel(Post::empty());
        Self {
            source: Arc::new(source),
            state: Arc::new(state),
            draft,
            post_created: OneShotEvent::new(),
            runtime,
        }
    }

    /// Subscribe to feed snapshots. The receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// The current feed snapshot.
    pub fn view_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Subscribe to draft changes.
    pub fn subscribe_draft(&self) -> watch::Receiver<Post> {
        self.draft.subscribe()
    }

    /// The current draft.
    pub fn draft(&self) -> Post {
        self.draft.borrow().clone()
    }

    /// Fired each time a submitted draft has been saved.
    pub fn post_created(&self) -> &OneShotEvent<()> {
        &self.post_created
    }

    /// Get a reference to the underlying source (for testing).
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reload the whole feed.
    ///
    /// Publishes a loading snapshot right away, then the loaded posts, or an
    /// error snapshot if the source fails transiently.
    pub fn load_feed(&self) -> FeedTask {
        let (snapshot, actions) = self.apply(FeedEvent::LoadRequested);
        self.spawn(actions, snapshot)
    }

    /// Reload the feed while keeping the current posts on screen.
    pub fn refresh_feed(&self) -> FeedTask {
        let (snapshot, actions) = self.apply(FeedEvent::RefreshRequested);
        self.spawn(actions, snapshot)
    }

    /// Start editing `post`.
    pub fn start_edit(&self, post: Post) {
        self.draft.send_replace(post);
    }

    /// Start composing a new post.
    pub fn start_new_post(&self) {
        self.draft.send_replace(Post::empty());
    }

    /// Set the draft content to the trimmed `text`.
    ///
    /// Returns `false`, without notifying draft subscribers, when the
    /// trimmed text is already the draft content.
    pub fn update_draft_content(&self, text: &str) -> bool {
        self.draft
            .send_if_modified(|current| match draft::edit_content(current, text) {
                Some(edited) => {
                    *current = edited;
                    true
                }
                None => false,
            })
    }

    /// Save the draft in the background and reset it immediately.
    ///
    /// [`post_created`](Self::post_created) fires once the save succeeds.
    /// The feed is not touched, and a transiently failed save is only logged.
    pub fn submit_draft(&self) -> FeedTask {
        let post = self.draft.send_replace(Post::empty());
        let source = Arc::clone(&self.source);
        let post_created = self.post_created.clone();

        tracing::debug!("Submitting draft for post {}", post.id);
        let handle = self.runtime.spawn(async move {
            match source.create(post).await {
                Ok(()) => {
                    post_created.emit(());
                    Ok(())
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!("Saving post failed, draft is lost: {}", e);
                    Ok(())
                }
                Err(e) => Err(fault("create", e)),
            }
        });
        FeedTask { handle }
    }

    /// Flip the like on a post, optimistically.
    ///
    /// The toggled snapshot is published before this returns. If the
    /// request fails transiently the previous snapshot is restored.
    ///
    /// Fails with [`FeedError::NotFound`] if the post is not in the current
    /// snapshot; nothing is published or sent in that case.
    pub fn toggle_like(&self, id: PostId) -> Result<FeedTask, FeedError> {
        let (snapshot, actions) = self.apply(FeedEvent::LikeToggled { id });
        if actions.is_empty() {
            tracing::debug!("Ignoring like for unknown post {}", id);
            return Err(FeedError::NotFound(id));
        }
        Ok(self.spawn(actions, snapshot))
    }

    /// Remove a post, optimistically.
    ///
    /// The post disappears before this returns and reappears if the delete
    /// fails transiently.
    pub fn remove_by_id(&self, id: PostId) -> FeedTask {
        let (snapshot, actions) = self.apply(FeedEvent::Removed { id });
        self.spawn(actions, snapshot)
    }

    /// Run an event through the state machine and publish the result.
    ///
    /// Returns the snapshot from before the event and the actions to run.
    /// Subscribers are only notified if the snapshot changed.
    fn apply(&self, event: FeedEvent) -> (ViewState, Vec<Action>) {
        let mut before = ViewState::idle();
        let mut actions = Vec::new();
        self.state.send_if_modified(|state| {
            before = state.clone();
            let (next, next_actions) = before.clone().on_event(event);
            actions = next_actions;
            let changed = next != *state;
            *state = next;
            changed
        });
        (before, actions)
    }

    fn spawn(&self, actions: Vec<Action>, snapshot: ViewState) -> FeedTask {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let handle = self.runtime.spawn(async move {
            for action in actions {
                execute(source.as_ref(), &state, action, &snapshot).await?;
            }
            Ok(())
        });
        FeedTask { handle }
    }
}

/// Perform one remote action and publish its outcome.
async fn execute<S: PostSource>(
    source: &S,
    state: &watch::Sender<ViewState>,
    action: Action,
    snapshot: &ViewState,
) -> Result<(), FeedError> {
    tracing::debug!("Dispatching {:?}", action);
    let outcome = match action {
        Action::FetchPosts => source
            .list()
            .await
            .map(|posts| Some(FeedEvent::Loaded { posts })),
        Action::Like { id } => source.like(id).await.map(|()| None),
        Action::Unlike { id } => source.unlike(id).await.map(|()| None),
        Action::Delete { id } => source.delete(id).await.map(|()| None),
    };

    let follow_up = match outcome {
        Ok(event) => event,
        Err(e) if e.is_transient() => match action {
            Action::FetchPosts => {
                tracing::warn!("Loading posts failed: {}", e);
                Some(FeedEvent::LoadFailed)
            }
            _ => {
                tracing::warn!("{:?} failed, restoring previous feed: {}", action, e);
                Some(FeedEvent::Restored {
                    snapshot: snapshot.clone(),
                })
            }
        },
        Err(e) => return Err(fault(&format!("{:?}", action), e)),
    };

    if let Some(event) = follow_up {
        state.send_modify(|current| {
            let (next, _) = std::mem::take(current).on_event(event);
            *current = next;
        });
    }
    Ok(())
}

/// Log and convert an error the controller does not recover from.
fn fault(operation: &str, error: SourceError) -> FeedError {
    tracing::error!("Unrecoverable error during {}: {}", operation, error);
    FeedError::Source(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MockCall, MockPostSource};
    use std::time::Duration;

    fn post(id: i64, likes: u64, liked_by_me: bool) -> Post {
        Post {
            id: PostId::new(id),
            author: "Netology".into(),
            content: format!("post {id}"),
            published: "21 May at 18:36".into(),
            liked_by_me,
            likes,
        }
    }

    fn network_down() -> SourceError {
        SourceError::Network("connection reset".into())
    }

    /// Controller with `posts` already loaded.
    async fn loaded(posts: Vec<Post>) -> (FeedController<MockPostSource>, MockPostSource) {
        let source = MockPostSource::with_posts(posts);
        let controller = FeedController::new(source.clone());
        controller.load_feed().join().await.unwrap();
        (controller, source)
    }

    // ===========================================
    // Load Tests
    // ===========================================

    #[tokio::test]
    async fn starts_idle_with_empty_draft() {
        let controller = FeedController::new(MockPostSource::new());

        assert_eq!(controller.view_state(), ViewState::idle());
        assert_eq!(controller.draft(), Post::empty());
    }

    #[tokio::test]
    async fn load_publishes_loading_immediately() {
        let source = MockPostSource::with_posts(vec![post(1, 3, false)]);
        let controller = FeedController::new(source.clone());

        let task = controller.load_feed();

        let state = controller.view_state();
        assert!(state.loading);
        assert!(state.posts.is_empty());
        task.join().await.unwrap();
    }

    #[tokio::test]
    async fn load_discards_previous_posts_while_fetching() {
        let (controller, source) = loaded(vec![post(1, 3, false)]).await;
        source.pause();

        let task = controller.load_feed();
        assert_eq!(controller.view_state(), ViewState::loading());

        source.resume();
        task.join().await.unwrap();
        assert_eq!(controller.view_state().posts.len(), 1);
    }

    #[tokio::test]
    async fn load_settles_with_server_posts() {
        let source = MockPostSource::with_posts(vec![post(1, 3, false)]);
        let controller = FeedController::new(source.clone());

        controller.load_feed().join().await.unwrap();

        let state = controller.view_state();
        assert_eq!(state.posts, vec![post(1, 3, false)]);
        assert!(!state.loading && !state.error && !state.empty);
        assert_eq!(source.calls(), vec![MockCall::List]);
    }

    #[tokio::test]
    async fn load_preserves_server_order() {
        let posts = vec![post(3, 0, false), post(1, 0, false), post(2, 0, false)];
        let (controller, _) = loaded(posts.clone()).await;

        assert_eq!(controller.view_state().posts, posts);
    }

    #[tokio::test]
    async fn load_of_empty_feed_is_empty() {
        let controller = FeedController::new(MockPostSource::new());

        controller.load_feed().join().await.unwrap();

        let state = controller.view_state();
        assert!(state.empty);
        assert!(!state.loading);
        assert!(!state.error);
        assert!(state.posts.is_empty());
    }

    #[tokio::test]
    async fn transient_load_failure_shows_error() {
        let source = MockPostSource::with_posts(vec![post(1, 0, false)]);
        source.fail_next_list(network_down());
        let controller = FeedController::new(source);

        controller.load_feed().join().await.unwrap();

        assert_eq!(controller.view_state(), ViewState::errored());
    }

    #[tokio::test]
    async fn retry_after_error_recovers() {
        let source = MockPostSource::with_posts(vec![post(1, 0, false)]);
        source.fail_next_list(SourceError::Status { status: 503 });
        let controller = FeedController::new(source);

        controller.load_feed().join().await.unwrap();
        assert!(controller.view_state().error);

        controller.load_feed().join().await.unwrap();
        let state = controller.view_state();
        assert!(!state.error);
        assert_eq!(state.posts.len(), 1);
    }

    #[tokio::test]
    async fn unrecoverable_load_failure_propagates() {
        let source = MockPostSource::new();
        source.fail_next_list(SourceError::Decode("expected array".into()));
        let controller = FeedController::new(source);

        let result = controller.load_feed().join().await;

        assert!(matches!(result, Err(FeedError::Source(_))));
        // Nothing handled it, so the screen is still loading
        assert!(controller.view_state().loading);
    }

    #[tokio::test]
    async fn refresh_keeps_posts_visible() {
        let (controller, source) = loaded(vec![post(1, 0, false)]).await;
        source.set_posts(vec![post(2, 0, false), post(1, 0, false)]);
        source.pause();

        let task = controller.refresh_feed();
        let during = controller.view_state();
        assert!(during.refreshing);
        assert_eq!(during.posts, vec![post(1, 0, false)]);

        source.resume();
        task.join().await.unwrap();
        let after = controller.view_state();
        assert!(!after.refreshing);
        assert_eq!(after.posts.len(), 2);
    }

    #[tokio::test]
    async fn load_before_subscribing_is_observed() {
        let source = MockPostSource::with_posts(vec![post(1, 0, false)]);
        let controller = FeedController::new(source);

        controller.load_feed().join().await.unwrap();
        let feed = controller.subscribe();

        assert_eq!(feed.borrow().posts.len(), 1);
    }

    #[tokio::test]
    async fn subscriber_sees_latest_snapshot() {
        let source = MockPostSource::with_posts(vec![post(1, 0, false)]);
        let controller = FeedController::new(source);
        let mut feed = controller.subscribe();

        controller.load_feed().join().await.unwrap();

        assert!(feed.has_changed().unwrap());
        let state = feed.borrow_and_update().clone();
        assert_eq!(state.posts.len(), 1);
    }

    // ===========================================
    // Draft Tests
    // ===========================================

    #[tokio::test]
    async fn start_edit_replaces_draft() {
        let controller = FeedController::new(MockPostSource::new());

        controller.start_edit(post(4, 0, false));
        assert_eq!(controller.draft(), post(4, 0, false));

        controller.start_new_post();
        assert_eq!(controller.draft(), Post::empty());
    }

    #[tokio::test]
    async fn update_content_trims() {
        let controller = FeedController::new(MockPostSource::new());
        controller.start_edit(post(4, 0, false));

        assert!(controller.update_draft_content("  edited text \n"));

        let draft = controller.draft();
        assert_eq!(draft.content, "edited text");
        assert_eq!(draft.id, PostId::new(4));
    }

    #[tokio::test]
    async fn identical_trimmed_content_notifies_once() {
        let controller = FeedController::new(MockPostSource::new());
        let mut drafts = controller.subscribe_draft();

        assert!(controller.update_draft_content(" hello "));
        assert!(drafts.has_changed().unwrap());
        drafts.borrow_and_update();

        assert!(!controller.update_draft_content("hello  "));
        assert!(!drafts.has_changed().unwrap());
    }

    #[tokio::test]
    async fn submit_resets_draft_before_save_returns() {
        let source = MockPostSource::new();
        let controller = FeedController::new(source.clone());
        source.pause();

        controller.start_edit(Post::empty());
        controller.update_draft_content(" hello ");
        let task = controller.submit_draft();

        assert_eq!(controller.draft(), Post::empty());
        assert!(source.calls().is_empty());

        source.resume();
        task.join().await.unwrap();
        assert_eq!(
            source.calls(),
            vec![MockCall::Create(Post::empty().with_content("hello"))]
        );
    }

    #[tokio::test]
    async fn successful_submit_fires_post_created() {
        let controller = FeedController::new(MockPostSource::new());
        let mut created = controller.post_created().subscribe().unwrap();

        controller.update_draft_content("new post");
        controller.submit_draft().join().await.unwrap();

        let fired = tokio::time::timeout(Duration::from_secs(2), created.recv()).await;
        assert!(fired.is_ok());
        assert_eq!(created.try_recv(), None);
    }

    #[tokio::test]
    async fn submit_does_not_touch_feed() {
        let (controller, source) = loaded(vec![post(1, 0, false)]).await;
        let before = controller.view_state();

        controller.update_draft_content("another");
        controller.submit_draft().join().await.unwrap();

        assert_eq!(controller.view_state(), before);
        assert_eq!(source.posts().len(), 2);
    }

    #[tokio::test]
    async fn failed_submit_is_silently_lost() {
        let source = MockPostSource::new();
        source.fail_next_create(network_down());
        let controller = FeedController::new(source.clone());

        controller.update_draft_content("lost post");
        let result = controller.submit_draft().join().await;

        assert!(result.is_ok());
        assert!(!controller.post_created().is_pending());
        assert_eq!(controller.draft(), Post::empty());
        assert!(source.posts().is_empty());
    }

    #[tokio::test]
    async fn unrecoverable_submit_failure_propagates() {
        let source = MockPostSource::new();
        source.fail_next_create(SourceError::Status { status: 400 });
        let controller = FeedController::new(source);

        let result = controller.submit_draft().join().await;

        assert!(matches!(result, Err(FeedError::Source(_))));
        assert!(!controller.post_created().is_pending());
    }

    // ===========================================
    // Like Tests
    // ===========================================

    #[tokio::test]
    async fn like_is_published_before_request_completes() {
        let (controller, source) = loaded(vec![post(1, 3, false)]).await;
        source.pause();

        let task = controller.toggle_like(PostId::new(1)).unwrap();

        let liked = controller.view_state().posts[0].clone();
        assert!(liked.liked_by_me);
        assert_eq!(liked.likes, 4);

        source.resume();
        task.join().await.unwrap();
        assert_eq!(controller.view_state().posts[0], liked);
        assert_eq!(source.posts()[0].likes, 4);
    }

    #[tokio::test]
    async fn failed_like_rolls_back() {
        let (controller, source) = loaded(vec![post(1, 3, false)]).await;
        source.fail_next_like(network_down());

        let task = controller.toggle_like(PostId::new(1)).unwrap();

        let optimistic = controller.view_state().posts[0].clone();
        assert_eq!(optimistic.likes, 4);
        assert!(optimistic.liked_by_me);

        task.join().await.unwrap();
        let reverted = controller.view_state().posts[0].clone();
        assert_eq!(reverted.likes, 3);
        assert!(!reverted.liked_by_me);
    }

    #[tokio::test]
    async fn toggling_liked_post_unlikes() {
        let (controller, source) = loaded(vec![post(1, 10, true)]).await;

        controller
            .toggle_like(PostId::new(1))
            .unwrap()
            .join()
            .await
            .unwrap();

        let state = controller.view_state();
        assert!(!state.posts[0].liked_by_me);
        assert_eq!(state.posts[0].likes, 9);
        assert!(source.calls().contains(&MockCall::Unlike(PostId::new(1))));
    }

    #[tokio::test]
    async fn double_toggle_restores_post() {
        let original = post(1, 3, false);
        let (controller, source) = loaded(vec![original.clone()]).await;

        controller.toggle_like(PostId::new(1)).unwrap().join().await.unwrap();
        controller.toggle_like(PostId::new(1)).unwrap().join().await.unwrap();

        assert_eq!(controller.view_state().posts[0], original);
        assert_eq!(
            source.calls(),
            vec![
                MockCall::List,
                MockCall::Like(PostId::new(1)),
                MockCall::Unlike(PostId::new(1)),
            ]
        );
    }

    #[tokio::test]
    async fn like_unknown_post_is_not_found() {
        let (controller, source) = loaded(vec![post(1, 3, false)]).await;
        let mut feed = controller.subscribe();
        feed.borrow_and_update();

        let result = controller.toggle_like(PostId::new(99));

        assert!(matches!(result, Err(FeedError::NotFound(id)) if id == PostId::new(99)));
        assert!(!feed.has_changed().unwrap());
        assert_eq!(source.calls(), vec![MockCall::List]);
    }

    #[tokio::test]
    async fn like_before_load_is_not_found() {
        let controller = FeedController::new(MockPostSource::new());

        let result = controller.toggle_like(PostId::new(1));
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn unrecoverable_like_failure_keeps_optimistic_state() {
        let (controller, source) = loaded(vec![post(1, 3, false)]).await;
        source.fail_next_like(SourceError::Status { status: 404 });

        let result = controller.toggle_like(PostId::new(1)).unwrap().join().await;

        assert!(matches!(result, Err(FeedError::Source(_))));
        assert_eq!(controller.view_state().posts[0].likes, 4);
    }

    // ===========================================
    // Remove Tests
    // ===========================================

    #[tokio::test]
    async fn remove_confirms_without_rollback() {
        let (controller, source) = loaded(vec![post(1, 0, false)]).await;

        let task = controller.remove_by_id(PostId::new(1));
        assert!(controller.view_state().posts.is_empty());

        task.join().await.unwrap();
        assert!(controller.view_state().posts.is_empty());
        assert!(source.posts().is_empty());
    }

    #[tokio::test]
    async fn failed_remove_restores_snapshot() {
        let (controller, source) = loaded(vec![post(1, 0, false), post(2, 5, true)]).await;
        let before = controller.view_state();
        source.fail_next_delete(network_down());

        let task = controller.remove_by_id(PostId::new(1));
        assert_eq!(controller.view_state().posts.len(), 1);

        task.join().await.unwrap();
        assert_eq!(controller.view_state(), before);
    }

    #[tokio::test]
    async fn remove_unknown_post_still_asks_server() {
        let (controller, source) = loaded(vec![post(1, 0, false)]).await;

        controller.remove_by_id(PostId::new(7)).join().await.unwrap();

        assert_eq!(controller.view_state().posts.len(), 1);
        assert!(source.calls().contains(&MockCall::Delete(PostId::new(7))));
    }

    #[tokio::test]
    async fn rollback_restores_whole_snapshot() {
        // Overlapping optimistic operations are not serialized: the failed
        // delete puts back the snapshot it captured, including post 2.
        let (controller, source) = loaded(vec![post(1, 0, false), post(2, 0, false)]).await;
        source.fail_next_delete(network_down());

        let first = controller.remove_by_id(PostId::new(1));
        let second = controller.remove_by_id(PostId::new(2));
        assert!(controller.view_state().posts.is_empty());

        first.join().await.unwrap();
        second.join().await.unwrap();

        let ids: Vec<PostId> = controller.view_state().posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PostId::new(1), PostId::new(2)]);
    }

    // ===========================================
    // Threading Tests
    // ===========================================

    #[test]
    fn operations_can_be_called_off_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let source = MockPostSource::with_posts(vec![post(1, 3, false)]);
        let controller = FeedController::with_runtime(source, runtime.handle().clone());

        let task = controller.load_feed();
        runtime.block_on(task.join()).unwrap();

        let task = controller.toggle_like(PostId::new(1)).unwrap();
        assert_eq!(controller.view_state().posts[0].likes, 4);
        runtime.block_on(task.join()).unwrap();
    }
}
