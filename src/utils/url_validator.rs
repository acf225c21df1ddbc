//! Target URL syntax checks.
//!
//! A target is accepted when it parses as an absolute URL with an `http` or
//! `https` scheme and a host containing at least one dot. The URL is never
//! rewritten: callers store exactly what they were given, and it is later
//! sent back as a `Location` header, so only visible ASCII is allowed.

use url::{Host, Url};

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL host must contain at least one dot")]
    MissingDottedHost,

    #[error("URL must contain only visible ASCII characters; percent-encode anything else")]
    UnencodedCharacters,
}

/// Checks `input` against the target URL contract.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidFormat`] for strings that are not absolute URLs
/// - [`UrlValidationError::UnsupportedProtocol`] for schemes other than HTTP(S)
/// - [`UrlValidationError::MissingDottedHost`] for hosts like `localhost`
/// - [`UrlValidationError::UnencodedCharacters`] for spaces, control or non-ASCII
///   characters, which `Url::parse` would silently strip or encode
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim() != input || input.is_empty() {
        return Err(UrlValidationError::InvalidFormat(
            "URL must be non-empty without surrounding whitespace".to_string(),
        ));
    }

    if !input.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(UrlValidationError::UnencodedCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(Host::Domain(domain)) if has_inner_dot(domain) => Ok(()),
        Some(Host::Ipv4(_)) => Ok(()),
        Some(Host::Ipv6(_)) | Some(Host::Domain(_)) | None => {
            Err(UrlValidationError::MissingDottedHost)
        }
    }
}

fn has_inner_dot(domain: &str) -> bool {
    let trimmed = domain.trim_end_matches('.');
    trimmed
        .split('.')
        .filter(|label| !label.is_empty())
        .count()
        >= 2
}
