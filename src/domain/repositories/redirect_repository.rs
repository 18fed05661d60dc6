//! Repository trait for redirect record storage.

use crate::domain::entities::{NewRedirectRecord, RedirectRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of an insert attempt against the uniqueness constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored.
    Created(RedirectRecord),
    /// Another record already owns the id.
    IdTaken,
    /// Another record already owns the URL.
    UrlTaken,
}

/// Repository interface for redirect records.
///
/// The storage backend must enforce uniqueness of both `id` and
/// `original_url`, and must apply counter increments atomically.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_redirect.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Inserts a record with `times_used = 0` and the current timestamp.
    ///
    /// Uniqueness conflicts are reported through [`InsertOutcome`] rather
    /// than as errors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_record: NewRedirectRecord) -> Result<InsertOutcome, AppError>;

    /// Finds a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i32) -> Result<Option<RedirectRecord>, AppError>;

    /// Finds a record by exact canonical URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<RedirectRecord>, AppError>;

    /// Returns whether a record with this id exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_id(&self, id: i32) -> Result<bool, AppError>;

    /// Atomically adds one to `times_used` and returns the updated record.
    ///
    /// Returns `Ok(None)` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_times_used(&self, id: i32) -> Result<Option<RedirectRecord>, AppError>;

    /// Lists records, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<RedirectRecord>, AppError>;

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sums `times_used` over all records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn total_uses(&self) -> Result<i64, AppError>;
}
