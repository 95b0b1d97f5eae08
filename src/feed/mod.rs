// Feed module.
// Provides the transport abstraction and payload types for the article feed.

pub mod client;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, FeedClient, Transport};
pub use types::{Article, FeedPayload};
