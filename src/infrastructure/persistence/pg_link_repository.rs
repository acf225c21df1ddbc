//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkRepository, StoreError};

/// PostgreSQL repository for link storage and retrieval.
///
/// Code ownership is decided by the primary key on `links.code`: inserts use
/// `ON CONFLICT DO NOTHING` and a zero row count means another writer won.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    code: String,
    target_url: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    custom: bool,
}

impl From<LinkRow> for LinkRecord {
    fn from(row: LinkRow) -> Self {
        LinkRecord::new(
            row.code,
            row.target_url,
            row.created_at,
            row.expires_at,
            row.custom,
        )
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create_if_absent(&self, record: LinkRecord) -> Result<LinkRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, target_url, created_at, expires_at, custom)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(&record.code)
        .bind(&record.target_url)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.custom)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(record.code));
        }

        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, target_url, created_at, expires_at, custom
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(LinkRecord::from))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE expires_at <= $1")
            .bind(now)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
