//! Redirect record mapping a numeric id to a canonical URL.

use chrono::{DateTime, Utc};

/// Largest id a record may carry (the storage column is a signed 32-bit integer).
pub const MAX_REDIRECT_ID: i32 = i32::MAX;

/// A stored redirect.
///
/// `id` is the value behind the short code, `original_url` is already
/// canonicalized. Only `times_used` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRecord {
    pub id: i32,
    pub original_url: String,
    pub times_used: i32,
    pub created_at: DateTime<Utc>,
}

impl RedirectRecord {
    /// Creates a new RedirectRecord instance.
    pub fn new(id: i32, original_url: String, times_used: i32, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            original_url,
            times_used,
            created_at,
        }
    }
}

/// Input data for inserting a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirectRecord {
    pub id: i32,
    pub original_url: String,
}
