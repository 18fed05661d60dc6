//! Application layer services implementing business logic.
//!
//! Services consume repository and probe traits and give the HTTP handlers
//! and the admin tool a small API to work with.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Id assignment and usage counting
//! - [`services::url_validator::UrlValidator`] - Scheme and reachability checks
//! - [`services::shortener_service::ShortenerService`] - Create and resolve flows

pub mod services;
