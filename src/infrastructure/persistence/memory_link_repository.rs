//! In-process link repository backed by a sharded concurrent map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkRepository, StoreError};

/// Link storage that lives for the lifetime of the process.
///
/// Inserts go through the map's entry API, which holds the shard lock for the
/// key while checking and inserting, so concurrent inserts of one code have a
/// single winner. Used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, LinkRecord>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create_if_absent(&self, record: LinkRecord) -> Result<LinkRecord, StoreError> {
        match self.links.entry(record.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.code)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.links.len() as u64)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.value().is_expired_at(now))
            .count() as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let before = self.links.len();
        self.links.retain(|_, record| !record.is_expired_at(now));
        Ok(before.saturating_sub(self.links.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    }

    fn record(code: &str, minutes: i64) -> LinkRecord {
        LinkRecord::new(
            code.to_string(),
            format!("https://example.com/{code}"),
            now(),
            now() + Duration::minutes(minutes),
            false,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryLinkRepository::new();

        let created = repo.create_if_absent(record("abc123", 30)).await.unwrap();
        assert_eq!(created.code, "abc123");

        let found = repo.find_by_code("abc123").await.unwrap();
        assert_eq!(found, Some(record("abc123", 30)));
        assert!(repo.find_by_code("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected_and_original_kept() {
        let repo = MemoryLinkRepository::new();
        repo.create_if_absent(record("dup", 30)).await.unwrap();

        let mut other = record("dup", 60);
        other.target_url = "https://other.example.com".to_string();
        let result = repo.create_if_absent(other).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists(code)) if code == "dup"));
        let kept = repo.find_by_code("dup").await.unwrap().unwrap();
        assert_eq!(kept.target_url, "https://example.com/dup");
    }

    #[tokio::test]
    async fn test_count_and_purge_expired() {
        let repo = MemoryLinkRepository::new();
        repo.create_if_absent(record("short", 5)).await.unwrap();
        repo.create_if_absent(record("medium", 30)).await.unwrap();
        repo.create_if_absent(record("long", 600)).await.unwrap();

        let later = now() + Duration::minutes(30);
        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(repo.count_expired(later).await.unwrap(), 2);

        assert_eq!(repo.purge_expired(later).await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find_by_code("long").await.unwrap().is_some());

        // Purged codes are free again.
        assert!(repo.create_if_absent(record("short", 5)).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_have_single_winner() {
        let repo = Arc::new(MemoryLinkRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create_if_absent(record("race", 30)).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
