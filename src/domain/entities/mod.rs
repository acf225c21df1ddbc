//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the rules that act on them live in
//! [`crate::domain::expiry`] and [`crate::application::services`].
//!
//! # Entity Types
//!
//! - [`LinkRecord`] - A stored short code to target URL mapping
//! - [`ShortLinkInfo`] - What a caller gets back after shortening

pub mod link;

pub use link::{LinkRecord, ShortLinkInfo};
