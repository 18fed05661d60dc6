//! Pure helpers shared by the services and the admin tool.
//!
//! - [`base_n`] - Base-N codec between record ids and short codes
//! - [`url_normalizer`] - URL canonicalization and display hostnames

pub mod base_n;
pub mod url_normalizer;
