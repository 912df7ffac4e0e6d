//! Submission repository.
//!
//! Queries are built at runtime with `query_as` so the crate compiles
//! without a live database.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use support_desk_core::{Category, Email, NewSubmission, Submission, SubmissionId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: i64,
    name: String,
    email: String,
    category: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = RepositoryError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in submission {}: {e}", row.id))
        })?;
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!("submission {}: {e}", row.id))
        })?;

        Ok(Self {
            id: SubmissionId::new(row.id),
            name: row.name,
            email,
            category,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for submission database operations.
pub struct SubmissionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SubmissionRepository<'a> {
    /// Create a new submission repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a validated submission and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, submission: &NewSubmission) -> Result<Submission, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            INSERT INTO submission (name, email, category, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, category, message, created_at
            ",
        )
        .bind(&submission.name)
        .bind(submission.email.as_str())
        .bind(submission.category.code())
        .bind(&submission.message)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// List every submission in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_all(&self) -> Result<Vec<Submission>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r"
            SELECT id, name, email, category, message, created_at
            FROM submission
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Submission::try_from).collect()
    }

    /// Get a single submission by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            SELECT id, name, email, category, message, created_at
            FROM submission
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Submission::try_from).transpose()
    }

    /// Count stored submissions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submission")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Permanently delete a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM submission WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
