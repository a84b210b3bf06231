//! # feed-client
//!
//! Feed controller with optimistic updates for the postfeed client.
//!
//! This is the main library that a presentation layer uses to show the feed.
//!
//! ## Features
//!
//! - **Single Snapshot**: one observable [`ViewState`](feed_core::ViewState) per screen
//! - **Optimistic Updates**: likes and deletes show up before the server confirms
//! - **Rollback**: transient failures restore the previous snapshot
//! - **Source Abstraction**: pluggable post source (HTTP, mock)
//! - **Pure State Machine**: uses feed-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use feed_client::{FeedController, HttpPostSource, HttpSourceConfig};
//!
//! let source = HttpPostSource::new(HttpSourceConfig::default())?;
//! let controller = FeedController::new(source);
//!
//! controller.load_feed();
//! controller.toggle_like(post_id)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod event;
pub mod source;

pub use controller::{FeedController, FeedTask};
pub use event::{EventError, EventSubscriber, OneShotEvent};
pub use source::{
    HttpPostSource, HttpSourceConfig, MockCall, MockPostSource, PostSource, SourceError,
};
