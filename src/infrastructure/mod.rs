//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`probe`] - Outbound HTTP reachability checks

pub mod persistence;
pub mod probe;
