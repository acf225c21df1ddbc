//! Utility functions for code generation and URL checks.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_validator`] - Target URL syntax contract

pub mod code_generator;
pub mod url_validator;
