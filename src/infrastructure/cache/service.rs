//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching code to target URL mappings on the redirect path.
///
/// Implementations must be thread-safe and fail open: a cache problem
/// degrades to a store lookup, never to a failed redirect.
///
/// Link records never change once written, so entries need no invalidation.
/// Callers bound each entry's lifetime by the record's remaining validity,
/// which keeps an expired link from being served from cache.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the target URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping.
    ///
    /// `max_ttl_seconds` is an upper bound on the entry's lifetime; the
    /// implementation applies the smaller of it and its own default TTL.
    async fn set_url(
        &self,
        code: &str,
        target_url: &str,
        max_ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reports.
    fn backend(&self) -> &'static str;
}
