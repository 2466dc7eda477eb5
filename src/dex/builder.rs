//! Builder for configuring a [`Pokedex`] service.

use std::time::Duration;

use super::Pokedex;
use crate::client::DEFAULT_BASE_URL;
use crate::retry::RetryConfig;

/// Default capacity of the position-keyed listing cache.
const DEFAULT_LIST_CAPACITY: usize = 200;

/// Default capacity of the id-keyed detail cache.
const DEFAULT_DETAIL_CAPACITY: usize = 100;

/// Default capacity of the `(tag, id)`-keyed type item cache.
const DEFAULT_TYPE_ITEM_CAPACITY: usize = 500;

/// Builder for [`Pokedex`].
///
/// ```rust
/// # use rotomdex::Pokedex;
/// let dex = Pokedex::builder()
///     .list_cache_capacity(50)
///     .prefetch(false)
///     .build();
/// # let _ = dex;
/// ```
#[derive(Debug, Clone)]
pub struct PokedexBuilder {
    pub(crate) base_url: String,
    pub(crate) list_capacity: usize,
    pub(crate) detail_capacity: usize,
    pub(crate) type_item_capacity: usize,
    pub(crate) prefetch: bool,
    pub(crate) retry_template: RetryConfig,
}

impl PokedexBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_capacity: DEFAULT_LIST_CAPACITY,
            detail_capacity: DEFAULT_DETAIL_CAPACITY,
            type_item_capacity: DEFAULT_TYPE_ITEM_CAPACITY,
            prefetch: true,
            retry_template: RetryConfig::new(),
        }
    }

    /// Point the service at a different API base URL (for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Capacity of the position-keyed listing cache. Default: 200.
    pub fn list_cache_capacity(mut self, capacity: usize) -> Self {
        self.list_capacity = capacity;
        self
    }

    /// Capacity of the id-keyed detail cache. Default: 100.
    pub fn detail_cache_capacity(mut self, capacity: usize) -> Self {
        self.detail_capacity = capacity;
        self
    }

    /// Capacity of the type item cache. Default: 500.
    pub fn type_item_cache_capacity(mut self, capacity: usize) -> Self {
        self.type_item_capacity = capacity;
        self
    }

    /// Enable or disable the background prefetch of the next page after
    /// a successful page load. Default: enabled.
    pub fn prefetch(mut self, enabled: bool) -> Self {
        self.prefetch = enabled;
        self
    }

    /// Override the backoff delays used by every retried call.
    ///
    /// Retry *counts* stay per call site (page listings, detail fetches
    /// and prefetch each have their own limit); this only tunes how long
    /// the waits between attempts are. Mostly useful in tests.
    pub fn retry_backoff(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.retry_template = self
            .retry_template
            .initial_delay(initial_delay)
            .max_delay(max_delay);
        self
    }

    /// Build the service.
    pub fn build(self) -> Pokedex {
        Pokedex::from_builder(&self)
    }
}

impl Default for PokedexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
