#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shortlink::application::services::{CodeAllocator, ResolverService};
use shortlink::domain::clock::ManualClock;
use shortlink::domain::entities::LinkRecord;
use shortlink::domain::expiry::ExpiryPolicy;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::cache::{CacheError, CacheResult, CacheService, NullCache};
use shortlink::infrastructure::persistence::MemoryLinkRepository;
use shortlink::state::AppState;
use shortlink::utils::code_generator::RandomCodeGenerator;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://s.test.com";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
}

/// Everything a handler test needs to drive and inspect the service.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryLinkRepository>,
    pub clock: Arc<ManualClock>,
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(Arc::new(NullCache::new()), RandomCodeGenerator::default(), 10)
}

pub fn create_test_state_with_cache(cache: Arc<dyn CacheService>) -> TestContext {
    create_test_state_with(cache, RandomCodeGenerator::default(), 10)
}

pub fn create_test_state_with(
    cache: Arc<dyn CacheService>,
    generator: RandomCodeGenerator,
    max_attempts: usize,
) -> TestContext {
    let store = Arc::new(MemoryLinkRepository::new());
    let clock = Arc::new(ManualClock::new(start_time()));

    let resolver = ResolverService::new(
        store.clone(),
        CodeAllocator::new(Arc::new(generator), max_attempts),
        ExpiryPolicy::default(),
        clock.clone(),
        BASE_URL,
    );

    TestContext {
        state: AppState::new(Arc::new(resolver), cache),
        store,
        clock,
    }
}

/// Inserts a link directly into the store, bypassing the resolver.
pub async fn create_test_link(
    store: &MemoryLinkRepository,
    code: &str,
    url: &str,
    validity_minutes: i64,
) -> LinkRecord {
    let created_at = start_time();
    let record = LinkRecord::new(
        code.to_string(),
        url.to_string(),
        created_at,
        created_at + chrono::Duration::minutes(validity_minutes),
        true,
    );

    store.create_if_absent(record).await.unwrap()
}

/// Cache that remembers every write and can be preloaded.
#[derive(Default)]
pub struct RecordingCache {
    pub entries: Mutex<Vec<(String, String, Option<u64>)>>,
}

impl RecordingCache {
    pub fn preload(&self, code: &str, url: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((code.to_string(), url.to_string(), None));
    }

    pub fn writes(&self) -> Vec<(String, String, Option<u64>)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheService for RecordingCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, _, _)| c == code)
            .map(|(_, url, _)| url.clone()))
    }

    async fn set_url(
        &self,
        code: &str,
        target_url: &str,
        max_ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries.lock().unwrap().push((
            code.to_string(),
            target_url.to_string(),
            max_ttl_seconds,
        ));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "recording"
    }
}

/// Cache whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get_url(&self, _code: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_url(
        &self,
        _code: &str,
        _target_url: &str,
        _max_ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
