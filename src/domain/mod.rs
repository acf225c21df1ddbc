//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait definitions
//! - [`expiry`] - Validity window computation and expiry checks
//! - [`clock`] - Injectable time source
//!
//! The domain layer has no dependencies on the HTTP or infrastructure layers.
//! Repository traits define contracts implemented by the infrastructure layer.

pub mod clock;
pub mod entities;
pub mod expiry;
pub mod repositories;
