use async_trait::async_trait;
use shortify_core::error::Result;
use shortify_core::{ReadRepository, Redirector, ServiceError, ShortCode, UrlCache};
use std::sync::Arc;
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only repository as the source of truth and a cache as derived
/// state keyed by short code. Only found mappings are cached, so a code that
/// gets minted later is never shadowed by an earlier miss.
#[derive(Debug)]
pub struct RedirectorService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> Clone for RedirectorService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: ReadRepository, C: UrlCache> RedirectorService<R, C> {
    /// Creates a new RedirectorService with the given repository and cache.
    pub fn new(repository: R, cache: C) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(cache))
    }

    /// Creates a new RedirectorService over a repository shared with the
    /// write path.
    pub fn from_shared(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> Redirector for RedirectorService<R, C> {
    async fn resolve(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "resolving short code");

        if let Some(long_url) = self.cache.get(code).await? {
            debug!(code = %code, "Resolved short code from cache");
            return Ok(long_url);
        }

        match self.repository.find_by_short_code(code).await? {
            Some(mapping) => {
                self.cache.set(code, &mapping.long_url).await?;
                debug!(code = %code, url = %mapping.long_url, "Resolved short code");
                Ok(mapping.long_url)
            }
            None => {
                trace!(code = %code, "Short code not found");
                Err(ServiceError::NotFound(code.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortify_cache::MokaUrlCache;
    use shortify_core::repository::Result as StorageResult;
    use shortify_core::{CacheError, NewUrlMapping, Repository, Shortener, StorageError, UrlMapping};
    use shortify_shortener::{RandomSuffix, ShortenerService};
    use shortify_storage::InMemoryRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s).unwrap()
    }

    /// Counts lookups against the wrapped store.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryRepository,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl ReadRepository for CountingRepository {
        async fn find_by_short_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_short_code(code).await
        }

        async fn find_by_long_url(&self, long_url: &str) -> StorageResult<Option<UrlMapping>> {
            self.inner.find_by_long_url(long_url).await
        }
    }

    /// A store whose lookups always time out.
    struct TimingOutRepository;

    #[async_trait]
    impl ReadRepository for TimingOutRepository {
        async fn find_by_short_code(&self, _code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
            Err(StorageError::Timeout("find_by_short_code".to_string()))
        }

        async fn find_by_long_url(&self, _long_url: &str) -> StorageResult<Option<UrlMapping>> {
            Err(StorageError::Timeout("find_by_long_url".to_string()))
        }
    }

    /// A cache that is always down.
    struct DownCache;

    #[async_trait]
    impl UrlCache for DownCache {
        async fn get(&self, _code: &ShortCode) -> shortify_core::cache::Result<Option<String>> {
            Err(CacheError::Timeout("get".to_string()))
        }

        async fn set(
            &self,
            _code: &ShortCode,
            _long_url: &str,
        ) -> shortify_core::cache::Result<()> {
            Err(CacheError::Timeout("set".to_string()))
        }
    }

    async fn store(repo: &InMemoryRepository, long_url: &str, c: &ShortCode) {
        let pending = repo.insert(NewUrlMapping::new(long_url)).await.unwrap();
        assert!(repo.update(pending.id, c).await.unwrap());
    }

    #[tokio::test]
    async fn resolve_existing_code() {
        let repo = InMemoryRepository::new();
        let c = code("1aB9z");
        store(&repo, "https://example.com", &c).await;
        let service = RedirectorService::new(repo, MokaUrlCache::new());

        assert_eq!(service.resolve(&c).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = RedirectorService::new(InMemoryRepository::new(), MokaUrlCache::new());

        let err = service.resolve(&code("zzzzzzzz")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(c) if c == "zzzzzzzz"));
    }

    #[tokio::test]
    async fn miss_populates_cache() {
        let repo = InMemoryRepository::new();
        let c = code("1aB9z");
        store(&repo, "https://example.com", &c).await;
        let cache = Arc::new(MokaUrlCache::new());
        let service = RedirectorService::from_shared(Arc::new(repo), Arc::clone(&cache));

        service.resolve(&c).await.unwrap();

        assert_eq!(
            cache.get(&c).await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn cache_hit_skips_store() {
        let repo = Arc::new(CountingRepository::default());
        let c = code("1aB9z");
        store(&repo.inner, "https://example.com", &c).await;
        let service =
            RedirectorService::from_shared(Arc::clone(&repo), Arc::new(MokaUrlCache::new()));

        for _ in 0..3 {
            assert_eq!(service.resolve(&c).await.unwrap(), "https://example.com");
        }

        assert_eq!(repo.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absence_is_not_cached() {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MokaUrlCache::new());
        let service = RedirectorService::from_shared(Arc::clone(&repo), Arc::clone(&cache));
        let c = code("1aB9z");

        assert!(service.resolve(&c).await.is_err());
        assert!(cache.get(&c).await.unwrap().is_none());

        store(&repo, "https://example.com", &c).await;
        assert_eq!(service.resolve(&c).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn wiped_cache_still_resolves() {
        let repo = InMemoryRepository::new();
        let c = code("1aB9z");
        store(&repo, "https://example.com", &c).await;
        let cache = Arc::new(MokaUrlCache::new());
        let service = RedirectorService::from_shared(Arc::new(repo), Arc::clone(&cache));

        service.resolve(&c).await.unwrap();
        cache.clear();

        assert_eq!(service.resolve(&c).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn cache_failure_is_propagated() {
        let repo = InMemoryRepository::new();
        let c = code("1aB9z");
        store(&repo, "https://example.com", &c).await;
        let service = RedirectorService::new(repo, DownCache);

        let err = service.resolve(&c).await.unwrap_err();

        assert!(matches!(err, ServiceError::Cache(CacheError::Timeout(_))));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn store_failure_is_propagated() {
        let cache = Arc::new(MokaUrlCache::new());
        let service =
            RedirectorService::from_shared(Arc::new(TimingOutRepository), Arc::clone(&cache));
        let c = code("1aB9z");

        let err = service.resolve(&c).await.unwrap_err();

        assert!(matches!(err, ServiceError::Storage(StorageError::Timeout(_))));
        assert!(err.is_retryable());
        assert!(cache.get(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolves_what_shortener_minted() {
        let repo = Arc::new(InMemoryRepository::new());
        let shortener = ShortenerService::from_shared(Arc::clone(&repo), Arc::new(RandomSuffix));
        let redirector =
            RedirectorService::from_shared(Arc::clone(&repo), Arc::new(MokaUrlCache::new()));

        let unknown = code("zzzzzzzz");
        assert!(matches!(
            redirector.resolve(&unknown).await,
            Err(ServiceError::NotFound(_))
        ));

        let minted = shortener.shorten("https://example.com/a").await.unwrap();

        assert_eq!(redirector.resolve(&minted).await.unwrap(), "https://example.com/a");
        assert!(matches!(
            redirector.resolve(&unknown).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
