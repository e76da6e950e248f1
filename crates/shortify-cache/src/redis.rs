use async_trait::async_trait;
use redis::AsyncCommands;
use shortify_core::cache::{Result, UrlCache};
use shortify_core::{CacheError, ShortCode};
use tracing::{debug, trace, warn};

const DEFAULT_KEY_PREFIX: &str = "shortify:url:";

/// A Redis-based implementation of [`UrlCache`].
///
/// Long URLs are stored as plain string values under
/// `<key_prefix><short_code>`, with no expiry; eviction is left to the
/// server's `maxmemory` policy.
#[derive(Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a new Redis URL cache with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for cache keys (e.g., "myapp:url:")
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Generates the cache key for a short code.
    pub fn cache_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

impl std::fmt::Debug for RedisUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlCache")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = self.cache_key(code);

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(long_url)) => {
                debug!(code = %code, "Cache hit in Redis");
                Ok(Some(long_url))
            }
            Ok(None) => {
                trace!(code = %code, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        let key = self.cache_key(code);

        let mut conn = self.conn.clone();
        match conn.set::<_, _, ()>(&key, long_url).await {
            Ok(()) => {
                trace!(code = %code, "Cached long url in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Failed to cache long url in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
