use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Longest URL the store accepts.
pub const MAX_LONG_URL_LENGTH: usize = 2048;

/// A persisted mapping between a long URL and its short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// Store-assigned identity, never reused.
    pub id: u64,
    /// The URL exactly as it was submitted.
    pub long_url: String,
    /// `None` while the mapping is pending between insert and update.
    pub short_code: Option<ShortCode>,
    pub created_at: Timestamp,
}

impl UrlMapping {
    /// Whether the mapping still waits for its short code.
    pub fn is_pending(&self) -> bool {
        self.short_code.is_none()
    }
}

/// A mapping to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlMapping {
    pub long_url: String,
    pub created_at: Timestamp,
}

impl NewUrlMapping {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing services like the redirector to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the finalized mapping for a short code.
    /// Pending mappings are never returned.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>>;

    /// Retrieves the mapping for an exact long URL, pending or not.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a pending mapping and returns it with its assigned id.
    /// Returns `Err(Conflict)` if the long URL is already stored.
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping>;

    /// Attaches a short code to the pending mapping `id`.
    ///
    /// Returns `false` when no pending mapping with that id exists (it was
    /// already finalized), and `Err(Conflict)` if another mapping owns `code`.
    async fn update(&self, id: u64, code: &ShortCode) -> Result<bool>;
}
