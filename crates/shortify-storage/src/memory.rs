use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortify_core::repository::{ReadRepository, Repository, Result};
use shortify_core::{NewUrlMapping, ShortCode, StorageError, UrlMapping};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Rows are keyed by id, with two unique indexes on long URL and short code.
/// Index slots are claimed through DashMap's entry API, so the uniqueness
/// checks and the writes happen under the same shard lock.
#[derive(Debug)]
pub struct InMemoryRepository {
    rows: DashMap<u64, UrlMapping>,
    by_long_url: DashMap<String, u64>,
    by_short_code: DashMap<ShortCode, u64>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: DashMap::with_capacity(capacity),
            by_long_url: DashMap::with_capacity(capacity),
            by_short_code: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored mappings, pending ones included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row(&self, id: u64) -> Option<UrlMapping> {
        self.rows.get(&id).map(|row| row.clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        let Some(id) = self.by_short_code.get(code).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.row(id))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        let Some(id) = self.by_long_url.get(long_url).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.row(id))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping> {
        match self.by_long_url.entry(mapping.long_url) {
            Entry::Occupied(entry) => Err(StorageError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let row = UrlMapping {
                    id,
                    long_url: entry.key().clone(),
                    short_code: None,
                    created_at: mapping.created_at,
                };
                self.rows.insert(id, row.clone());
                entry.insert(id);
                Ok(row)
            }
        }
    }

    async fn update(&self, id: u64, code: &ShortCode) -> Result<bool> {
        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };

        if !row.is_pending() {
            return Ok(false);
        }

        match self.by_short_code.entry(code.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(entry) => {
                row.short_code = Some(code.clone());
                entry.insert(id);
                Ok(true)
            }
        }
    }
}
