// Article feed loader library.
// Fetches a JSON article feed, renders escaped HTML, and caches it with stale fallback.

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod loader;
pub mod render;

pub use config::LoaderConfig;
pub use error::{FeedError, Result};
pub use loader::{FeedLoader, LoadOutcome};
