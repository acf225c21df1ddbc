//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the operations HTTP
//! handlers and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::code_allocator::CodeAllocator`] - Generated and custom code reservation
//! - [`services::resolver_service::ResolverService`] - Shorten and resolve operations

pub mod services;
