//! DTOs for link shortening endpoints.

use crate::domain::entities::ShortLinkInfo;
use crate::error::ErrorInfo;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DefaultOnError, DeserializeAs, SerializeAs, serde_as};
use validator::Validate;

/// Request to shorten a single URL.
///
/// Field names follow the public API (`targetUrl`, `validityMinutes`,
/// `customCode`); the form-style names `url`, `validity` and `shortcode` are
/// accepted as aliases.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to redirect to; syntax is checked by the resolver.
    #[serde(alias = "url")]
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters"))]
    pub target_url: String,

    /// Validity window in minutes.
    ///
    /// Read like a form field: floats are truncated, strings contribute
    /// their leading integer (`" 15"`, `"10.5"`, `"12min"`). Anything
    /// without one is treated as absent so the default window applies.
    #[serde_as(as = "DefaultOnError<Option<LenientMinutes>>")]
    #[serde(default, alias = "validity")]
    pub validity_minutes: Option<i64>,

    /// Optional caller-chosen short code. An empty string means "generate one".
    #[serde(default, alias = "shortcode")]
    pub custom_code: Option<String>,
}

impl ShortenRequest {
    /// Custom code with empty input treated as absent.
    pub fn custom_code(&self) -> Option<String> {
        self.custom_code.clone().filter(|code| !code.is_empty())
    }
}

/// Minute count accepted as an integer, a float or a numeric string.
pub struct LenientMinutes;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMinutes {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> DeserializeAs<'de, i64> for LenientMinutes {
    fn deserialize_as<D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawMinutes::deserialize(deserializer)? {
            RawMinutes::Int(minutes) => Ok(minutes),
            // `as` saturates at the i64 bounds.
            RawMinutes::Float(minutes) if minutes.is_finite() => Ok(minutes.trunc() as i64),
            RawMinutes::Float(_) => Err(D::Error::custom("validity is not a finite number")),
            RawMinutes::Text(text) => leading_integer(&text)
                .ok_or_else(|| D::Error::custom("validity has no leading integer")),
        }
    }
}

impl SerializeAs<i64> for LenientMinutes {
    fn serialize_as<S>(minutes: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*minutes)
    }
}

/// Integer prefix of `text` after leading whitespace, with an optional sign.
///
/// Digit runs too long for `i64` saturate; the expiry policy clamps them.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<ShortLinkInfo> for ShortenResponse {
    fn from(info: ShortLinkInfo) -> Self {
        Self {
            code: info.code,
            short_url: info.short_url,
            target_url: info.target_url,
            created_at: info.created_at,
            expires_at: info.expires_at,
        }
    }
}

/// Request to shorten several URLs at once.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchShortenRequest {
    #[validate(length(min = 1, max = 5, message = "Batch must contain 1-5 URLs"))]
    #[validate(nested)]
    pub urls: Vec<ShortenRequest>,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct BatchShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ShortenResultItem {
    Success {
        target_url: String,
        code: String,
        short_url: String,
        expires_at: DateTime<Utc>,
    },
    Error {
        target_url: String,
        error: ErrorInfo,
    },
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
