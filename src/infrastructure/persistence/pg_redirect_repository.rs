//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewRedirectRecord, RedirectRecord};
use crate::domain::repositories::{InsertOutcome, RedirectRepository};
use crate::error::AppError;

/// Primary key constraint of the `redirects` table.
const ID_CONSTRAINT: &str = "redirects_pkey";

/// Row shape shared by every query that returns a record.
#[derive(sqlx::FromRow)]
struct RedirectRow {
    id: i32,
    original_url: String,
    times_used: i32,
    created_at: DateTime<Utc>,
}

impl From<RedirectRow> for RedirectRecord {
    fn from(row: RedirectRow) -> Self {
        RedirectRecord::new(row.id, row.original_url, row.times_used, row.created_at)
    }
}

/// PostgreSQL repository for redirect records.
///
/// Uses SQLx prepared statements for SQL injection protection and type safety.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn insert(&self, new_record: NewRedirectRecord) -> Result<InsertOutcome, AppError> {
        let inserted = sqlx::query_as::<_, RedirectRow>(
            r#"
            INSERT INTO redirects (id, original_url)
            VALUES ($1, $2)
            ON CONFLICT (original_url) DO NOTHING
            RETURNING id, original_url, times_used, created_at
            "#,
        )
        .bind(new_record.id)
        .bind(&new_record.original_url)
        .fetch_optional(self.pool.as_ref())
        .await;

        match inserted {
            Ok(Some(row)) => Ok(InsertOutcome::Created(row.into())),
            Ok(None) => Ok(InsertOutcome::UrlTaken),
            Err(e) if is_unique_violation_on(&e, ID_CONSTRAINT) => Ok(InsertOutcome::IdTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<RedirectRecord>, AppError> {
        let row = sqlx::query_as::<_, RedirectRow>(
            r#"
            SELECT id, original_url, times_used, created_at
            FROM redirects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<RedirectRecord>, AppError> {
        let row = sqlx::query_as::<_, RedirectRow>(
            r#"
            SELECT id, original_url, times_used, created_at
            FROM redirects
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_id(&self, id: i32) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM redirects WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn increment_times_used(&self, id: i32) -> Result<Option<RedirectRecord>, AppError> {
        // Single statement: the row lock taken by UPDATE serializes concurrent increments.
        let row = sqlx::query_as::<_, RedirectRow>(
            r#"
            UPDATE redirects
            SET times_used = times_used + 1
            WHERE id = $1
            RETURNING id, original_url, times_used, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<RedirectRecord>, AppError> {
        let offset = (page - 1) * page_size;

        let rows = sqlx::query_as::<_, RedirectRow>(
            r#"
            SELECT id, original_url, times_used, created_at
            FROM redirects
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redirects")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_uses(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(times_used), 0)::BIGINT FROM redirects",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }
}

/// Returns true if `e` is a unique violation of the named constraint.
fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
