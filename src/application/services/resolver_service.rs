//! Shorten and resolve operations composed over allocation, storage and expiry.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::code_allocator::CodeAllocator;
use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, ShortLinkInfo};
use crate::domain::expiry::ExpiryPolicy;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_target_url;

/// Service for creating short links and resolving them back to targets.
///
/// Validation, allocation, expiry computation and persistence happen in that
/// order; nothing is written unless every earlier step succeeds.
pub struct ResolverService {
    store: Arc<dyn LinkRepository>,
    allocator: CodeAllocator,
    expiry: ExpiryPolicy,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl ResolverService {
    /// Creates a new resolver service.
    ///
    /// `base_url` is the public origin short URLs are built on, e.g.
    /// `https://s.example.com`.
    pub fn new(
        store: Arc<dyn LinkRepository>,
        allocator: CodeAllocator,
        expiry: ExpiryPolicy,
        clock: Arc<dyn Clock>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            allocator,
            expiry,
            clock,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &Arc<dyn LinkRepository> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Creates a short link for `target_url`.
    ///
    /// # Arguments
    ///
    /// - `target_url` - Stored verbatim; must be HTTP(S) with a dotted host
    /// - `validity_minutes` - Validity window; `None` or non-positive uses the default
    /// - `custom_code` - Caller-chosen code; generated when `None`
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the target fails the URL contract
    /// - [`AppError::InvalidCode`] if the custom code is malformed or reserved
    /// - [`AppError::CodeTaken`] if the custom code is already held
    /// - [`AppError::AllocationExhausted`] if every generated candidate collided
    /// - [`AppError::Internal`] on storage failures
    pub async fn shorten(
        &self,
        target_url: &str,
        validity_minutes: Option<i64>,
        custom_code: Option<String>,
    ) -> Result<ShortLinkInfo, AppError> {
        validate_target_url(target_url).map_err(|e| {
            AppError::invalid_url(
                "Invalid URL format",
                json!({ "url": target_url, "reason": e.to_string() }),
            )
        })?;

        let created_at = self.clock.now();
        let expires_at = self.expiry.compute_expiry(created_at, validity_minutes);

        let record = match custom_code {
            Some(code) => {
                let record = LinkRecord::new(
                    code,
                    target_url.to_string(),
                    created_at,
                    expires_at,
                    true,
                );
                self.allocator
                    .claim_custom(self.store.as_ref(), record)
                    .await?
            }
            None => {
                self.allocator
                    .allocate(self.store.as_ref(), |code| {
                        LinkRecord::new(
                            code,
                            target_url.to_string(),
                            created_at,
                            expires_at,
                            false,
                        )
                    })
                    .await?
            }
        };

        info!(
            code = %record.code,
            custom = record.custom,
            expires_at = %record.expires_at,
            "Short link created"
        );

        Ok(self.to_info(record))
    }

    /// Returns the live record for `code`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no record holds the code
    /// - [`AppError::Expired`] if the record's validity window has passed
    /// - [`AppError::Internal`] on storage failures
    pub async fn lookup_active(&self, code: &str) -> Result<LinkRecord, AppError> {
        let record = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        if self.expiry.is_expired(&record, self.clock.now()) {
            return Err(AppError::expired(
                "Short link has expired",
                json!({ "code": code, "expired_at": record.expires_at }),
            ));
        }

        Ok(record)
    }

    /// Resolves `code` to its target URL.
    ///
    /// # Errors
    ///
    /// See [`Self::lookup_active`].
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.lookup_active(code).await.map(|record| record.target_url)
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    fn to_info(&self, record: LinkRecord) -> ShortLinkInfo {
        ShortLinkInfo {
            short_url: self.short_url(&record.code),
            code: record.code,
            target_url: record.target_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            custom: record.custom,
        }
    }
}
