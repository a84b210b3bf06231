//! # feed-types
//!
//! Data types for the postfeed client.
//!
//! This crate provides the foundational types used across all postfeed crates:
//! - [`PostId`] - Server-assigned post identity
//! - [`Post`] - A single feed entry, as sent over the wire
//! - [`FeedError`] - Error types surfaced by the feed controller

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod post;

pub use error::FeedError;
pub use ids::PostId;
pub use post::Post;
