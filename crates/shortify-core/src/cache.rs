use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache from short codes to long URLs.
///
/// The cache is derived state: it holds nothing that cannot be rebuilt from
/// the repository, and reads may miss at any time regardless of earlier
/// writes. Implementations can use Redis, in-memory caches, or both.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the long URL for `code`.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Store the long URL for `code`, replacing any previous value.
    async fn set(&self, code: &ShortCode, long_url: &str) -> Result<()>;
}
