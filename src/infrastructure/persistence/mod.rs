//! Link repository implementations.
//!
//! # Repositories
//!
//! - [`MemoryLinkRepository`] - Concurrent in-process map, used without a database
//! - [`PgLinkRepository`] - PostgreSQL storage via SQLx

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
