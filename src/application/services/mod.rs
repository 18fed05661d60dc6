//! Business logic services for the application layer.

pub mod redirect_service;
pub mod shortener_service;
pub mod url_validator;

pub use redirect_service::RedirectService;
pub use shortener_service::{CreateOutcome, ResolveError, ShortenerService};
pub use url_validator::{UrlValidator, ValidationError};
