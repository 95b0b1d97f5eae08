// Article feed loader.
// Decides whether each load is served from fresh cache, the network, or stale cache.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::{self, Store};
use crate::config::LoaderConfig;
use crate::feed::{FeedPayload, Transport};
use crate::render::{self, DisplaySink};

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Which source served a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Cache entry inside the validity window; no request made.
    FromCache,
    /// Fetch succeeded and the cache was refreshed.
    Fetched,
    /// Fetch failed; an expired cache entry was rendered.
    StaleFallback,
    /// Fetch failed and nothing usable was cached.
    Empty,
}

/// Loads the feed into a display sink, caching successful fetches.
pub struct FeedLoader<T, S, D, C = SystemClock> {
    transport: T,
    store: S,
    sink: D,
    clock: C,
    config: LoaderConfig,
}

impl<T, S, D> FeedLoader<T, S, D, SystemClock>
where
    T: Transport,
    S: Store,
    D: DisplaySink,
{
    /// Create a loader using the wall clock.
    pub fn new(transport: T, store: S, sink: D, config: LoaderConfig) -> Self {
        Self::with_clock(transport, store, sink, SystemClock, config)
    }
}

impl<T, S, D, C> FeedLoader<T, S, D, C>
where
    T: Transport,
    S: Store,
    D: DisplaySink,
    C: Clock,
{
    /// Create a loader with an explicit clock.
    pub fn with_clock(transport: T, store: S, sink: D, clock: C, config: LoaderConfig) -> Self {
        Self {
            transport,
            store,
            sink,
            clock,
            config,
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Get the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the display sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Consume the loader, returning the display sink.
    pub fn into_sink(self) -> D {
        self.sink
    }

    /// Render the feed once: fresh cache, then network, then stale cache, then the empty state.
    /// Never fails; every error degrades to a less fresh source.
    pub async fn load(&mut self) -> LoadOutcome {
        if let Some(feed) = self.read_cache() {
            self.render(&feed);
            info!("using cached data");
            return LoadOutcome::FromCache;
        }

        let endpoint = self.config.endpoint().to_string();
        match self.transport.fetch(&endpoint).await {
            Ok(feed) => {
                self.render(&feed);
                let now = self.clock.now_ms();
                let key = &self.config.cache_key;
                if let Err(e) = cache::write_entry(&mut self.store, key, &feed, now) {
                    warn!(error = %e, key = %key, "failed to cache feed");
                }
                info!(articles = feed.articles.len(), "using fetched data");
                LoadOutcome::Fetched
            }
            Err(e) => {
                warn!(error = %e, endpoint = %endpoint, "fetch failed, falling back to cache");
                self.render_fallback()
            }
        }
    }

    /// The cached payload, if present and inside the validity window.
    pub fn read_cache(&self) -> Option<FeedPayload> {
        let now = self.clock.now_ms();
        match cache::read_if_valid(
            &self.store,
            &self.config.cache_key,
            now,
            self.config.validity_window,
        ) {
            Ok(Some(feed)) => Some(feed),
            Ok(None) => {
                debug!(key = %self.config.cache_key, "no valid cache entry");
                None
            }
            Err(e) => {
                warn!(error = %e, key = %self.config.cache_key, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Write `feed` to the sink, or the empty state if it has no articles.
    pub fn render(&mut self, feed: &FeedPayload) {
        match render::render_feed(feed) {
            Some(html) => self.sink.append(&html),
            None => render::render_empty(&mut self.sink, self.config.empty_state),
        }
    }

    // Any stored entry qualifies here, however old.
    fn render_fallback(&mut self) -> LoadOutcome {
        match cache::read_entry(&self.store, &self.config.cache_key) {
            Ok(Some(entry)) => {
                self.render(&entry.data);
                info!(
                    age_ms = entry.age_ms(self.clock.now_ms()),
                    "using expired data"
                );
                LoadOutcome::StaleFallback
            }
            Ok(None) => {
                render::render_empty(&mut self.sink, self.config.empty_state);
                LoadOutcome::Empty
            }
            Err(e) => {
                warn!(error = %e, "cached feed is unreadable");
                render::render_empty(&mut self.sink, self.config.empty_state);
                LoadOutcome::Empty
            }
        }
    }
}
