//! Collision-free short code allocation.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved, validate_custom_code};

/// Default number of generated candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Assigns short codes to records through the store's atomic insert.
///
/// Uniqueness is never decided by a lookup followed by an insert; the store's
/// [`LinkRepository::create_if_absent`] is the only arbiter, so concurrent
/// allocations for the same code always produce a single winner.
pub struct CodeAllocator {
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl CodeAllocator {
    /// Creates an allocator. `max_attempts` is raised to 1 if zero.
    pub fn new(generator: Arc<dyn CodeGenerator>, max_attempts: usize) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Produces a candidate code without touching storage.
    pub fn generate(&self) -> String {
        self.generator.generate()
    }

    /// Atomically claims `record.code` in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] on collision; the caller decides
    /// whether that means "try another candidate" or "code taken".
    pub async fn reserve(
        &self,
        store: &dyn LinkRepository,
        record: LinkRecord,
    ) -> Result<LinkRecord, StoreError> {
        store.create_if_absent(record).await
    }

    /// Reserves a freshly generated code, retrying on collision.
    ///
    /// `build` turns a candidate code into the record to insert.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] once `max_attempts` candidates
    /// have collided, and [`AppError::Internal`] on storage failures.
    pub async fn allocate<F>(&self, store: &dyn LinkRepository, build: F) -> Result<LinkRecord, AppError>
    where
        F: Fn(String) -> LinkRecord + Send,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generate();

            if is_reserved(&candidate) {
                debug!(attempt, code = %candidate, "Generated code is reserved, retrying");
                continue;
            }

            match self.reserve(store, build(candidate)).await {
                Ok(record) => return Ok(record),
                Err(StoreError::AlreadyExists(code)) => {
                    debug!(attempt, code = %code, "Generated code collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Code allocation exhausted without a free candidate"
        );

        Err(AppError::allocation_exhausted(
            "Failed to allocate a unique short code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Reserves a caller-chosen code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if the code is malformed or reserved,
    /// [`AppError::CodeTaken`] if another record holds it, and
    /// [`AppError::Internal`] on storage failures.
    pub async fn claim_custom(
        &self,
        store: &dyn LinkRepository,
        record: LinkRecord,
    ) -> Result<LinkRecord, AppError> {
        validate_custom_code(&record.code)?;

        match self.reserve(store, record).await {
            Ok(record) => Ok(record),
            Err(StoreError::AlreadyExists(code)) => Err(AppError::code_taken(
                "Custom code already exists",
                json!({ "code": code }),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
