//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated with `mockall` for unit tests.
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod redirect_repository;

pub use redirect_repository::{InsertOutcome, RedirectRepository};

#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
