//! Repository trait for short link storage.

use crate::domain::entities::LinkRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Errors reported by link storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another record already holds this code.
    #[error("short code `{0}` already exists")]
    AlreadyExists(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Durable mapping from short code to [`LinkRecord`].
///
/// # Atomicity
///
/// [`create_if_absent`](Self::create_if_absent) is the single serialization
/// point for code ownership: among any number of concurrent callers inserting
/// the same code, exactly one succeeds and all others get
/// [`StoreError::AlreadyExists`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process concurrent map
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts `record` unless its code is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if any record, expired or not,
    /// holds the code. Returns [`StoreError::Backend`] on storage failures.
    async fn create_if_absent(&self, record: LinkRecord) -> Result<LinkRecord, StoreError>;

    /// Finds a record by its short code, regardless of expiry.
    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Counts all stored records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Counts records whose expiry is at or before `now`.
    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Deletes records whose expiry is at or before `now`, returning how many were removed.
    ///
    /// Purged codes become available for allocation again.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
