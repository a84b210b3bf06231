//! # feed-core
//!
//! Pure logic for postfeed (no I/O, instant tests).
//!
//! This crate implements the feed state machine and draft editing rules
//! without any network access, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`ViewState::on_event`] maps an event to the next snapshot plus the
//!   remote calls that must follow it
//! - [`draft::edit_content`] decides whether a content edit changes the draft
//!
//! The actual I/O is performed by `feed-client`, which interprets the
//! actions produced here and publishes the resulting snapshots.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod draft;
pub mod state;
pub mod view;

pub use state::{Action, FeedEvent};
pub use view::ViewState;
