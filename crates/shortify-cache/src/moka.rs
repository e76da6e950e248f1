use async_trait::async_trait;
use moka::future::Cache;
use shortify_core::cache::{Result, UrlCache};
use shortify_core::ShortCode;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache implementation using Moka.
///
/// Suited to single-node deployments, or as the L1 in front of Redis in a
/// [`LayeredCache`](crate::LayeredCache). Entries are evicted by size, and
/// optionally by TTL/TTI when built from a [`CacheConfig`].
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<ShortCode, String>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.cache.get(code).await {
            Some(long_url) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(long_url))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        self.cache.insert(code.clone(), long_url.to_owned()).await;
        trace!(code = %code, "Cached long url in Moka");
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder =
            Cache::builder().max_capacity(config.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY));

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
