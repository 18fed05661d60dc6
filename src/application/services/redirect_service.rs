//! Redirect record store: id assignment and usage counting.

use std::sync::Arc;

use rand::Rng;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{MAX_REDIRECT_ID, NewRedirectRecord, RedirectRecord};
use crate::domain::repositories::{InsertOutcome, RedirectRepository};
use crate::error::AppError;

/// Sole authority for assigning redirect ids and mutating usage counters.
pub struct RedirectService<R: RedirectRepository> {
    repository: Arc<R>,
}

impl<R: RedirectRepository> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the record for a canonical URL, creating it if needed.
    ///
    /// # Id Assignment
    ///
    /// A new id is drawn uniformly from `[0, 2^31 - 1]` and redrawn while it
    /// collides with an existing record. There is no attempt cap: with random
    /// ids the chance of a collision reaches 50% only after roughly 55 000
    /// records.
    ///
    /// # Concurrency
    ///
    /// Two concurrent calls for the same URL converge on one record: the
    /// loser of the insert race sees [`InsertOutcome::UrlTaken`] and returns
    /// the winner's record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_or_create(&self, original_url: &str) -> Result<RedirectRecord, AppError> {
        if let Some(existing) = self.repository.find_by_original_url(original_url).await? {
            return Ok(existing);
        }

        loop {
            let id = random_id();

            if self.repository.exists_by_id(id).await? {
                debug!("Redirect id {} already taken, drawing again", id);
                continue;
            }

            let new_record = NewRedirectRecord {
                id,
                original_url: original_url.to_string(),
            };

            match self.repository.insert(new_record).await? {
                InsertOutcome::Created(record) => {
                    info!("Created redirect {} for {}", record.id, record.original_url);
                    return Ok(record);
                }
                InsertOutcome::IdTaken => {
                    debug!("Redirect id {} taken concurrently, drawing again", id);
                }
                InsertOutcome::UrlTaken => {
                    debug!("Redirect for {} created concurrently", original_url);
                    return self
                        .repository
                        .find_by_original_url(original_url)
                        .await?
                        .ok_or_else(|| {
                            AppError::internal(
                                "Redirect disappeared after a conflicting insert",
                                json!({ "url": original_url }),
                            )
                        });
                }
            }
        }
    }

    /// Atomically increments the usage counter of a record.
    ///
    /// Returns the updated record, or `None` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn increment_usage(&self, id: i32) -> Result<Option<RedirectRecord>, AppError> {
        self.repository.increment_times_used(id).await
    }

    /// Retrieves a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn get(&self, id: i32) -> Result<RedirectRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "id": id })))
    }

    /// Lists records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a page or page size below 1.
    pub async fn list(&self, page: i64, page_size: i64) -> Result<Vec<RedirectRecord>, AppError> {
        if page < 1 || page_size < 1 {
            return Err(AppError::bad_request(
                "Page and page size must be at least 1",
                json!({ "page": page, "page_size": page_size }),
            ));
        }

        self.repository.list(page, page_size).await
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Sum of all usage counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn total_uses(&self) -> Result<i64, AppError> {
        self.repository.total_uses().await
    }
}

/// Draws a candidate id uniformly from `[0, MAX_REDIRECT_ID]`.
fn random_id() -> i32 {
    rand::rng().random_range(0..=MAX_REDIRECT_ID)
}
