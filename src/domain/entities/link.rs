//! Link record representing a short code mapped to its target URL.

use chrono::{DateTime, Utc};

/// A stored short-link mapping.
///
/// Records are immutable once created: the code is assigned exactly once and
/// the target and expiry never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// `true` when the caller chose the code instead of the generator.
    pub custom: bool,
}

impl LinkRecord {
    /// Creates a new LinkRecord instance.
    pub fn new(
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        custom: bool,
    ) -> Self {
        Self {
            code,
            target_url,
            created_at,
            expires_at,
            custom,
        }
    }

    /// Returns true if the record has reached its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whole seconds of validity left at `now`, or zero once expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}

/// Result of a successful shorten operation, as handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLinkInfo {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub custom: bool,
}
