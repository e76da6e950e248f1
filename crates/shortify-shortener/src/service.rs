use crate::suffix::{RandomSuffix, SuffixGenerator};
use async_trait::async_trait;
use shortify_core::error::Result;
use shortify_core::repository::MAX_LONG_URL_LENGTH;
use shortify_core::{
    NewUrlMapping, Repository, ServiceError, ShortCode, Shortener, StorageError, UrlMapping,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// How many times a shorten re-reads after losing a uniqueness race.
const MAX_ATTEMPTS: usize = 3;

/// A concrete implementation of the `Shortener` trait.
///
/// Every mapping is written in two steps: a pending row is inserted to obtain
/// its id, then the code `base62(id) + suffix` is attached with a conditional
/// update. The store's uniqueness constraints arbitrate concurrent requests
/// for the same URL; the loser re-reads and returns the winner's code.
///
/// The write path never touches the cache.
#[derive(Debug)]
pub struct ShortenerService<R, S = RandomSuffix> {
    repository: Arc<R>,
    suffix: Arc<S>,
}

impl<R, S> Clone for ShortenerService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            suffix: Arc::clone(&self.suffix),
        }
    }
}

impl<R: Repository> ShortenerService<R, RandomSuffix> {
    /// Creates a new `ShortenerService` drawing suffixes from [`RandomSuffix`].
    pub fn new(repository: R) -> Self {
        Self::with_suffix_generator(repository, RandomSuffix)
    }
}

impl<R: Repository, S: SuffixGenerator> ShortenerService<R, S> {
    /// Creates a new `ShortenerService` with a custom suffix generator.
    pub fn with_suffix_generator(repository: R, suffix: S) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(suffix))
    }

    /// Creates a new `ShortenerService` over an already shared repository.
    pub fn from_shared(repository: Arc<R>, suffix: Arc<S>) -> Self {
        Self { repository, suffix }
    }

    /// Checks that `long_url` is an absolute http(s) URL the store can hold.
    fn validate_url(long_url: &str) -> Result<()> {
        let reject = |reason: &str| -> Result<()> {
            debug!(long_url, reason, "Rejected long url");
            Err(ServiceError::InvalidInput(long_url.to_string()))
        };

        if long_url.is_empty() {
            return reject("empty");
        }
        if long_url.chars().count() > MAX_LONG_URL_LENGTH {
            return reject("too long");
        }
        // Url::parse silently strips these, and the stored value must be
        // what gets redirected to.
        if long_url.trim() != long_url {
            return reject("surrounding whitespace");
        }
        if long_url.chars().any(char::is_control) {
            return reject("control characters");
        }

        let parsed = match Url::parse(long_url) {
            Ok(parsed) => parsed,
            Err(_) => return reject("unparsable"),
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return reject("scheme must be http or https");
        }
        if parsed.host().is_none() {
            return reject("missing host");
        }

        Ok(())
    }

    /// Attaches a freshly assembled code to the pending mapping.
    ///
    /// Returns `None` when the race for this row was lost and the caller
    /// should re-read.
    async fn finalize(&self, mapping: &UrlMapping) -> Result<Option<ShortCode>> {
        let code = ShortCode::assemble(mapping.id, self.suffix.generate());

        match self.repository.update(mapping.id, &code).await {
            Ok(true) => {
                info!(
                    id = mapping.id,
                    code = %code,
                    long_url = %mapping.long_url,
                    "Created short code"
                );
                Ok(Some(code))
            }
            Ok(false) => {
                debug!(id = mapping.id, "Mapping finalized concurrently");
                Ok(None)
            }
            Err(StorageError::Conflict(e)) => {
                warn!(id = mapping.id, code = %code, error = %e, "Short code already taken");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<R: Repository, S: SuffixGenerator> Shortener for ShortenerService<R, S> {
    async fn shorten(&self, long_url: &str) -> Result<ShortCode> {
        Self::validate_url(long_url)?;

        for attempt in 1..=MAX_ATTEMPTS {
            let pending = match self.repository.find_by_long_url(long_url).await? {
                Some(UrlMapping {
                    short_code: Some(code),
                    ..
                }) => {
                    debug!(code = %code, "Long url already shortened");
                    return Ok(code);
                }
                Some(pending) => {
                    debug!(id = pending.id, "Completing pending mapping");
                    pending
                }
                None => match self.repository.insert(NewUrlMapping::new(long_url)).await {
                    Ok(inserted) => inserted,
                    Err(StorageError::Conflict(_)) => {
                        debug!(attempt, "Long url inserted concurrently, re-reading");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                },
            };

            if let Some(code) = self.finalize(&pending).await? {
                return Ok(code);
            }
        }

        warn!(long_url, attempts = MAX_ATTEMPTS, "Gave up resolving uniqueness conflict");
        Err(ServiceError::ConstraintViolation(long_url.to_string()))
    }
}
