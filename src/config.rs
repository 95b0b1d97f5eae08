// Loader configuration.
// Endpoint selection, cache key, validity window, and empty-state handling.

use std::time::Duration;

use crate::render::EmptyState;

pub const DEFAULT_ENDPOINT: &str = "https://vanillajsacademy.com/api/pirates.json";
pub const DEFAULT_FAILURE_ENDPOINT: &str = "https://vanillajsacademy.com/api/fail.json";
pub const DEFAULT_CACHE_KEY: &str = "cachedPirates";

/// Default validity window: 5 seconds.
pub const DEFAULT_VALIDITY_WINDOW: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Feed URL used in normal operation.
    pub endpoint: String,
    /// Deliberately failing URL used when `simulate_failure` is set.
    pub failure_endpoint: String,
    /// Fault injection: fetch from `failure_endpoint` to exercise the fallback path.
    pub simulate_failure: bool,
    /// Cached data younger than this skips the network.
    pub validity_window: Duration,
    pub cache_key: String,
    pub empty_state: EmptyState,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            failure_endpoint: DEFAULT_FAILURE_ENDPOINT.to_string(),
            simulate_failure: false,
            validity_window: DEFAULT_VALIDITY_WINDOW,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            empty_state: EmptyState::default(),
        }
    }
}

impl LoaderConfig {
    /// The URL this configuration fetches from.
    pub fn endpoint(&self) -> &str {
        if self.simulate_failure {
            &self.failure_endpoint
        } else {
            &self.endpoint
        }
    }
}
