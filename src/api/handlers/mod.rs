//! HTTP request handlers.
//!
//! Each handler module corresponds to one endpoint.

pub mod create;
pub mod health;
pub mod index;
pub mod resolve;

pub use create::create_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use resolve::resolve_handler;
