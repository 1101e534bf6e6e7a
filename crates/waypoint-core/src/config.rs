//! Router configuration

use crate::url::UrlOptions;
use waypoint_router::DEFAULT_CACHE_CAPACITY;

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Memoized segments per trie node; 0 disables the lookup cache
    pub cache_capacity: usize,
    /// Defaults for URL generation
    pub url_defaults: UrlOptions,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            url_defaults: UrlOptions::default(),
        }
    }
}

impl RouterConfig {
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn url_defaults(mut self, defaults: UrlOptions) -> Self {
        self.url_defaults = defaults;
        self
    }
}
