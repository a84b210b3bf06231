//! Mock post source for testing.
//!
//! Keeps an in-memory feed, records every call, and can be told to fail
//! the next call of a given kind or to hold calls until resumed.

use super::{PostSource, SourceError};
use async_trait::async_trait;
use feed_types::{Post, PostId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// A call received by [`MockPostSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `list()`
    List,
    /// `create(post)`
    Create(Post),
    /// `like(id)`
    Like(PostId),
    /// `unlike(id)`
    Unlike(PostId),
    /// `delete(id)`
    Delete(PostId),
}

/// Mock post source for testing.
///
/// Clones share state, so a test can keep a handle while the controller
/// owns another.
#[derive(Debug, Clone)]
pub struct MockPostSource {
    inner: Arc<Mutex<MockPostSourceInner>>,
    paused: Arc<watch::Sender<bool>>,
}

#[derive(Debug, Default)]
struct MockPostSourceInner {
    posts: Vec<Post>,
    calls: Vec<MockCall>,
    last_id: i64,
    fail_next_list: Option<SourceError>,
    fail_next_create: Option<SourceError>,
    fail_next_like: Option<SourceError>,
    fail_next_unlike: Option<SourceError>,
    fail_next_delete: Option<SourceError>,
}

impl MockPostSource {
    /// Create a mock source with an empty feed.
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            inner: Arc::new(Mutex::new(MockPostSourceInner::default())),
            paused: Arc::new(paused),
        }
    }

    /// Create a mock source serving the given posts.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let source = Self::new();
        source.set_posts(posts);
        source
    }

    /// Replace the server-side feed.
    pub fn set_posts(&self, posts: Vec<Post>) {
        let mut inner = self.lock();
        inner.last_id = posts.iter().map(|p| p.id.value()).max().unwrap_or(0);
        inner.posts = posts;
    }

    /// Current server-side feed.
    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Cause the next `list()` to fail with the given error.
    pub fn fail_next_list(&self, error: SourceError) {
        self.lock().fail_next_list = Some(error);
    }

    /// Cause the next `create()` to fail with the given error.
    pub fn fail_next_create(&self, error: SourceError) {
        self.lock().fail_next_create = Some(error);
    }

    /// Cause the next `like()` to fail with the given error.
    pub fn fail_next_like(&self, error: SourceError) {
        self.lock().fail_next_like = Some(error);
    }

    /// Cause the next `unlike()` to fail with the given error.
    pub fn fail_next_unlike(&self, error: SourceError) {
        self.lock().fail_next_unlike = Some(error);
    }

    /// Cause the next `delete()` to fail with the given error.
    pub fn fail_next_delete(&self, error: SourceError) {
        self.lock().fail_next_delete = Some(error);
    }

    /// Hold every call at its start until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    /// Let held and future calls proceed.
    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    fn lock(&self) -> MutexGuard<'_, MockPostSourceInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn gate(&self) {
        let mut paused = self.paused.subscribe();
        // The sender lives as long as `self`, so this only ends once resumed.
        let _ = paused.wait_for(|paused| !*paused).await;
    }
}

impl Default for MockPostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPostSourceInner {
    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, SourceError> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SourceError::Status { status: 404 })
    }
}

#[async_trait]
impl PostSource for MockPostSource {
    async fn list(&self) -> Result<Vec<Post>, SourceError> {
        self.gate().await;
        let mut inner = self.lock();
        inner.calls.push(MockCall::List);

        // Check for forced failure
        if let Some(error) = inner.fail_next_list.take() {
            return Err(error);
        }

        Ok(inner.posts.clone())
    }

    async fn create(&self, post: Post) -> Result<(), SourceError> {
        self.gate().await;
        let mut inner = self.lock();
        inner.calls.push(MockCall::Create(post.clone()));

        if let Some(error) = inner.fail_next_create.take() {
            return Err(error);
        }

        if post.id.is_new() {
            inner.last_id += 1;
            let saved = Post {
                id: PostId::new(inner.last_id),
                ..post
            };
            // Newest first, like the real server
            inner.posts.insert(0, saved);
        } else {
            let existing = inner.post_mut(post.id)?;
            existing.content = post.content;
        }
        Ok(())
    }

    async fn like(&self, id: PostId) -> Result<(), SourceError> {
        self.gate().await;
        let mut inner = self.lock();
        inner.calls.push(MockCall::Like(id));

        if let Some(error) = inner.fail_next_like.take() {
            return Err(error);
        }

        let post = inner.post_mut(id)?;
        if !post.liked_by_me {
            *post = post.toggled_like();
        }
        Ok(())
    }

    async fn unlike(&self, id: PostId) -> Result<(), SourceError> {
        self.gate().await;
        let mut inner = self.lock();
        inner.calls.push(MockCall::Unlike(id));

        if let Some(error) = inner.fail_next_unlike.take() {
            return Err(error);
        }

        let post = inner.post_mut(id)?;
        if post.liked_by_me {
            *post = post.toggled_like();
        }
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), SourceError> {
        self.gate().await;
        let mut inner = self.lock();
        inner.calls.push(MockCall::Delete(id));

        if let Some(error) = inner.fail_next_delete.take() {
            return Err(error);
        }

        inner.posts.retain(|p| p.id != id);
        Ok(())
    }
}
