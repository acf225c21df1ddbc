//! Business logic services for the application layer.

pub mod code_allocator;
pub mod resolver_service;

pub use code_allocator::CodeAllocator;
pub use resolver_service::ResolverService;
