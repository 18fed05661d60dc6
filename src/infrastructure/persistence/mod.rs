//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgRedirectRepository`] - Redirect record storage, lookup and counters

pub mod pg_redirect_repository;

pub use pg_redirect_repository::PgRedirectRepository;
