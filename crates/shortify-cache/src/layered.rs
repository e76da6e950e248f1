use async_trait::async_trait;
use shortify_core::cache::{Result, UrlCache};
use shortify_core::ShortCode;
use tracing::{debug, trace};

/// A multi-layer cache that composes two cache implementations.
///
/// L1 is typically a fast, process-local cache (e.g. [`MokaUrlCache`]) and
/// L2 a shared, distributed one (e.g. [`RedisUrlCache`]).
///
/// - **Get**: try L1, then L2. An L2 hit is backfilled into L1.
/// - **Set**: write L2 first, then L1.
///
/// [`MokaUrlCache`]: crate::MokaUrlCache
/// [`RedisUrlCache`]: crate::RedisUrlCache
///
/// # Example
///
/// ```rust,no_run
/// use shortify_cache::{LayeredCache, MokaUrlCache, RedisUrlCache};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let l1 = MokaUrlCache::with_capacity(10_000);
/// let l2 = RedisUrlCache::connect("redis://127.0.0.1:6379").await?;
/// let cache = LayeredCache::new(l1, l2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    /// Creates a new layered cache with the given L1 and L2 caches.
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

#[async_trait]
impl<L1, L2> UrlCache for LayeredCache<L1, L2>
where
    L1: UrlCache,
    L2: UrlCache,
{
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        if let Some(long_url) = self.l1.get(code).await? {
            debug!(code = %code, "L1 cache hit");
            return Ok(Some(long_url));
        }

        trace!(code = %code, "L1 cache miss, trying L2");
        match self.l2.get(code).await? {
            Some(long_url) => {
                debug!(code = %code, "L2 cache hit, backfilling L1");
                self.l1.set(code, &long_url).await?;
                Ok(Some(long_url))
            }
            None => {
                trace!(code = %code, "L2 cache miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        // An entry is only ever in L1 if the L2 write succeeded.
        self.l2.set(code, long_url).await?;
        self.l1.set(code, long_url).await?;
        trace!(code = %code, "Stored in L1 and L2 caches");
        Ok(())
    }
}
