//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect caching (Redis and no-op implementations)
//! - [`persistence`] - Link storage (in-memory and PostgreSQL)

pub mod cache;
pub mod persistence;
