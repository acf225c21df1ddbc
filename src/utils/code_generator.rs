//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly from a fixed alphabet at a fixed length.
//! Custom codes supplied by callers are checked for shape and against the
//! routes they would otherwise shadow.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Compiled regex for custom code characters.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Lowercase base36 alphabet used for generated codes by default.
pub const DEFAULT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated codes by default.
pub const DEFAULT_CODE_LENGTH: usize = 6;

const CUSTOM_CODE_MIN_LEN: usize = 4;
const CUSTOM_CODE_MAX_LEN: usize = 32;

/// Reserved codes that cannot be used as short links.
///
/// These collide with fixed routes of the HTTP API.
pub const RESERVED_CODES: &[&str] = &["health", "shorten", "api"];

/// Returns true if `code` names a reserved route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Produces candidate short codes.
///
/// Implementations are pure generators and never consult storage;
/// uniqueness is established later by the atomic reserve path.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random codes over a fixed alphabet.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator over `alphabet` producing codes of `length` characters.
    ///
    /// # Errors
    ///
    /// Returns a message if the alphabet is empty, has duplicates or
    /// characters that are not URL-path safe, or if `length` is zero.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, String> {
        let chars: Vec<char> = alphabet.chars().collect();

        if chars.is_empty() {
            return Err("code alphabet must not be empty".to_string());
        }
        if length == 0 {
            return Err("code length must be at least 1".to_string());
        }
        if let Some(bad) = chars.iter().find(|c| !is_code_char(**c)) {
            return Err(format!("code alphabet contains unsupported character {bad:?}"));
        }

        let mut seen = chars.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != chars.len() {
            return Err("code alphabet contains duplicate characters".to_string());
        }

        Ok(Self {
            alphabet: chars,
            length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct codes this generator can produce, saturating at `u128::MAX`.
    pub fn code_space(&self) -> u128 {
        (self.alphabet.len() as u128)
            .checked_pow(self.length as u32)
            .unwrap_or(u128::MAX)
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::InvalidCode`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let len = code.chars().count();
    if !(CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&len) {
        return Err(AppError::invalid_code(
            "Custom code must be 4-32 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::invalid_code(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(AppError::invalid_code(
            "Custom code cannot start or end with a hyphen",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::invalid_code(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
