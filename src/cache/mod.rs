// Cache module for persisting the last fetched feed.
// Stores feed payloads with a fetch timestamp for TTL checks and stale fallback.

pub mod paths;
pub mod store;

pub use paths::cache_dir;
pub use store::{
    CacheEntry, FileStore, MemoryStore, Store, read_entry, read_if_valid, write_entry,
};
