//! Expiry computation and checks for link records.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::LinkRecord;

/// Validity applied when the caller gives none, or gives a non-positive value.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Upper bound on requested validity (one year).
pub const MAX_VALIDITY_MINUTES: i64 = 525_600;

/// Computes and checks link expiration timestamps.
///
/// Requested validity is never an error: missing, zero or negative input falls
/// back to the default window, and anything above the ceiling is clamped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    default_minutes: i64,
    max_minutes: i64,
}

impl ExpiryPolicy {
    /// Creates a policy with the given default and ceiling, both in minutes.
    ///
    /// Non-positive arguments are replaced with the built-in constants and the
    /// ceiling is raised to the default if it is lower.
    pub fn new(default_minutes: i64, max_minutes: i64) -> Self {
        let default_minutes = if default_minutes > 0 {
            default_minutes
        } else {
            DEFAULT_VALIDITY_MINUTES
        };
        let max_minutes = if max_minutes > 0 {
            max_minutes
        } else {
            MAX_VALIDITY_MINUTES
        };

        Self {
            default_minutes,
            max_minutes: max_minutes.max(default_minutes),
        }
    }

    pub fn default_minutes(&self) -> i64 {
        self.default_minutes
    }

    pub fn max_minutes(&self) -> i64 {
        self.max_minutes
    }

    /// Resolves the requested validity to the number of minutes actually applied.
    pub fn effective_minutes(&self, validity_minutes: Option<i64>) -> i64 {
        match validity_minutes {
            Some(minutes) if minutes > 0 => minutes.min(self.max_minutes),
            _ => self.default_minutes,
        }
    }

    /// Returns the expiry timestamp for a link created at `now`.
    pub fn compute_expiry(&self, now: DateTime<Utc>, validity_minutes: Option<i64>) -> DateTime<Utc> {
        let minutes = self.effective_minutes(validity_minutes);

        Duration::try_minutes(minutes)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns true once `now` has reached the record's expiry.
    pub fn is_expired(&self, record: &LinkRecord, now: DateTime<Utc>) -> bool {
        record.is_expired_at(now)
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDITY_MINUTES, MAX_VALIDITY_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_omitted_validity_uses_default() {
        let policy = ExpiryPolicy::default();
        assert_eq!(
            policy.compute_expiry(now(), None),
            now() + Duration::minutes(30)
        );
    }

    #[test]
    fn test_non_positive_validity_uses_default() {
        let policy = ExpiryPolicy::default();
        assert_eq!(
            policy.compute_expiry(now(), Some(0)),
            now() + Duration::minutes(30)
        );
        assert_eq!(
            policy.compute_expiry(now(), Some(-15)),
            now() + Duration::minutes(30)
        );
    }

    #[test]
    fn test_positive_validity_is_honoured() {
        let policy = ExpiryPolicy::default();
        assert_eq!(
            policy.compute_expiry(now(), Some(90)),
            now() + Duration::minutes(90)
        );
    }

    #[test]
    fn test_validity_is_clamped_to_ceiling() {
        let policy = ExpiryPolicy::new(30, 120);
        assert_eq!(policy.effective_minutes(Some(10_000)), 120);
        assert_eq!(
            policy.compute_expiry(now(), Some(i64::MAX)),
            now() + Duration::minutes(120)
        );
    }

    #[test]
    fn test_custom_default() {
        let policy = ExpiryPolicy::new(5, 60);
        assert_eq!(policy.default_minutes(), 5);
        assert_eq!(
            policy.compute_expiry(now(), None),
            now() + Duration::minutes(5)
        );
    }

    #[test]
    fn test_invalid_construction_falls_back() {
        let policy = ExpiryPolicy::new(0, -1);
        assert_eq!(policy.default_minutes(), DEFAULT_VALIDITY_MINUTES);
        assert_eq!(policy.max_minutes(), MAX_VALIDITY_MINUTES);

        let policy = ExpiryPolicy::new(90, 60);
        assert_eq!(policy.max_minutes(), 90);
    }

    #[test]
    fn test_is_expired() {
        let policy = ExpiryPolicy::default();
        let record = LinkRecord::new(
            "abc".to_string(),
            "https://example.com".to_string(),
            now(),
            policy.compute_expiry(now(), None),
            false,
        );

        assert!(!policy.is_expired(&record, now()));
        assert!(!policy.is_expired(&record, now() + Duration::minutes(29)));
        assert!(policy.is_expired(&record, now() + Duration::minutes(30)));
    }
}
