use thiserror::Error;

/// Result type for the shortening and resolution engines.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortCodeError {
    #[error("short code length must be between 1 and {max}, got {actual}")]
    InvalidLength { max: usize, actual: usize },
    #[error("short code must contain only base62 characters: '{0}'")]
    InvalidCharacters(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A uniqueness constraint on `long_url` or `short_code` was violated.
    #[error("mapping already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors surfaced by [`Shortener`](crate::Shortener) and
/// [`Redirector`](crate::Redirector) implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidInput(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("uniqueness conflict could not be resolved: {0}")]
    ConstraintViolation(String),
    #[error("storage dependency failed: {0}")]
    Storage(#[from] StorageError),
    #[error("cache dependency failed: {0}")]
    Cache(#[from] CacheError),
}

impl ServiceError {
    /// Whether the failure came from the store or the cache.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Cache(_))
    }

    /// Whether the caller may retry the same request.
    ///
    /// Retrying a shorten is safe: the dedup lookup returns the code minted
    /// by the earlier attempt if it got that far.
    pub fn is_retryable(&self) -> bool {
        self.is_dependency_failure() || matches!(self, Self::ConstraintViolation(_))
    }
}
