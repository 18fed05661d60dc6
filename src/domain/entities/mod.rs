//! Core domain entities.
//!
//! - [`RedirectRecord`] - A stored mapping from id to canonical URL
//! - [`NewRedirectRecord`] - Data needed to create one

pub mod redirect;

pub use redirect::{MAX_REDIRECT_ID, NewRedirectRecord, RedirectRecord};
