// Cache store for reading and writing feed entries.
// Handles the key-value store seam, JSON serialization, and TTL checking.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::feed::FeedPayload;

use super::paths;

/// String key-value store that survives across runs.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform cache directory.
    pub fn in_cache_dir() -> Result<Self> {
        paths::cache_dir().map(Self::new).ok_or(FeedError::NoCacheDir)
    }

    /// Get the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = paths::entry_path(&self.dir, key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = paths::entry_path(&self.dir, key);

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// A stored feed together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: FeedPayload,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Create an entry stamped at `timestamp`.
    pub fn new(data: FeedPayload, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    /// Milliseconds since the entry was written. Negative if written "in the future".
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Fresh enough to skip the network: `now - timestamp < window`.
    pub fn is_valid(&self, now: i64, window: Duration) -> bool {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        self.age_ms(now) < window_ms
    }
}

/// Read the raw entry regardless of age.
pub fn read_entry<S: Store + ?Sized>(store: &S, key: &str) -> Result<Option<CacheEntry>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    let entry: CacheEntry = serde_json::from_str(&raw)?;
    Ok(Some(entry))
}

/// Read the entry's payload, returning None if missing or expired.
pub fn read_if_valid<S: Store + ?Sized>(
    store: &S,
    key: &str,
    now: i64,
    window: Duration,
) -> Result<Option<FeedPayload>> {
    match read_entry(store, key)? {
        Some(entry) if entry.is_valid(now, window) => Ok(Some(entry.data)),
        _ => Ok(None),
    }
}

/// Overwrite the entry for `key` with `data` stamped at `now`.
pub fn write_entry<S: Store + ?Sized>(
    store: &mut S,
    key: &str,
    data: &FeedPayload,
    now: i64,
) -> Result<()> {
    let entry = CacheEntry::new(data.clone(), now);
    let json = serde_json::to_string(&entry)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Article;
    use tempfile::TempDir;

    const WINDOW: Duration = Duration::from_millis(5000);

    fn feed() -> FeedPayload {
        FeedPayload {
            publication: "The Pirate Times".to_string(),
            tagline: "Arr".to_string(),
            articles: vec![Article {
                title: "Ahoy".to_string(),
                author: "Anne Bonny".to_string(),
                article: "Yo ho.".to_string(),
            }],
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get("cachedPirates").unwrap(), None);

        store.set("cachedPirates", "hello").unwrap();
        assert_eq!(store.get("cachedPirates").unwrap().as_deref(), Some("hello"));
        assert!(temp_dir.path().join("nested/cachedPirates.json").exists());
        assert!(!temp_dir.path().join("nested/cachedPirates.tmp").exists());

        store.set("cachedPirates", "again").unwrap();
        assert_eq!(store.get("cachedPirates").unwrap().as_deref(), Some("again"));
    }

    #[test]
    fn test_entry_json_shape() {
        let mut store = MemoryStore::new();
        write_entry(&mut store, "k", &feed(), 1_700_000_000_000).unwrap();

        let raw = store.get("k").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000_000i64);
        assert_eq!(value["data"]["publication"], "The Pirate Times");
        assert_eq!(value["data"]["articles"][0]["author"], "Anne Bonny");
    }

    #[test]
    fn test_validity_window() {
        let now = 1_000_000;

        let fresh = CacheEntry::new(feed(), now - 1);
        assert!(fresh.is_valid(now, WINDOW));

        let stale = CacheEntry::new(feed(), now - 6000);
        assert!(!stale.is_valid(now, WINDOW));

        // Boundary is exclusive
        let edge = CacheEntry::new(feed(), now - 5000);
        assert!(!edge.is_valid(now, WINDOW));

        let future = CacheEntry::new(feed(), now + 60_000);
        assert!(future.is_valid(now, WINDOW));
    }

    #[test]
    fn test_read_if_valid() {
        let mut store = MemoryStore::new();
        let now = 1_000_000;

        assert_eq!(read_if_valid(&store, "k", now, WINDOW).unwrap(), None);

        write_entry(&mut store, "k", &feed(), now - 1).unwrap();
        assert_eq!(read_if_valid(&store, "k", now, WINDOW).unwrap(), Some(feed()));

        write_entry(&mut store, "k", &feed(), now - 6000).unwrap();
        assert_eq!(read_if_valid(&store, "k", now, WINDOW).unwrap(), None);
        // Stale entries remain readable for fallback
        assert!(read_entry(&store, "k").unwrap().is_some());
    }

    #[test]
    fn test_read_malformed_entry() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert!(matches!(read_entry(&store, "k"), Err(FeedError::Json(_))));

        store.set("k", r#"{"timestamp": 5}"#).unwrap();
        assert!(matches!(read_entry(&store, "k"), Err(FeedError::Json(_))));
    }
}
