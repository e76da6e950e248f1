use async_trait::async_trait;
use jiff::Timestamp;
use shortify_core::repository::{ReadRepository, Repository, Result};
use shortify_core::{NewUrlMapping, ShortCode, StorageError, UrlMapping};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace};

/// MySQL implementation of the repository contract.
///
/// Long URL uniqueness is enforced through a stored SHA-256 column, because
/// a unique index over the full `VARCHAR(2048)` would exceed InnoDB's key
/// length. Pending rows keep `short_code` as `NULL`, which the unique index
/// on `short_code` ignores.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn parse_short_code(raw: Option<String>) -> Result<Option<ShortCode>> {
    raw.map(|value| {
        ShortCode::new(&value).map_err(|e| {
            StorageError::InvalidData(format!("invalid short_code '{}': {e}", value))
        })
    })
    .transpose()
}

fn row_to_mapping(row: MySqlRow) -> Result<UrlMapping> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let short_code: Option<String> = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(UrlMapping {
        id,
        long_url,
        short_code: parse_short_code(short_code)?,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        trace!(code = %code, "querying mapping by short code");

        let row = sqlx::query(
            r#"
            SELECT id, long_url, short_code, created_at
            FROM shortened_url
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, long_url, short_code, created_at
            FROM shortened_url
            WHERE long_url_hash = UNHEX(SHA2(?, 256))
              AND long_url = ?
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, mapping: NewUrlMapping) -> Result<UrlMapping> {
        let result = sqlx::query(
            r#"
            INSERT INTO shortened_url (long_url, short_code, created_at)
            VALUES (?, NULL, ?)
            "#,
        )
        .bind(&mapping.long_url)
        .bind(mapping.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_id();
                debug!(id, "inserted pending mapping");
                Ok(UrlMapping {
                    id,
                    long_url: mapping.long_url,
                    short_code: None,
                    created_at: parse_created_at(mapping.created_at.as_second())?,
                })
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(mapping.long_url)),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update(&self, id: u64, code: &ShortCode) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shortened_url
            SET short_code = ?
            WHERE id = ?
              AND short_code IS NULL
            "#,
        )
        .bind(code.as_str())
        .bind(id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
