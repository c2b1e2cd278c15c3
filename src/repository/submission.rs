//! Submission repository

use crate::domain::{Submission, SubmissionStatus};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Insert a fully prepared submission and return the stored row
    async fn create(&self, submission: &Submission) -> Result<Submission>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>>;
    /// Newest first, optionally restricted to one status
    async fn list(&self, status: Option<SubmissionStatus>) -> Result<Vec<Submission>>;
    /// Persist every field of `submission`. `None` when the row no longer exists.
    async fn update(&self, submission: &Submission) -> Result<Option<Submission>>;
    /// Returns whether a row was deleted
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct SubmissionRepositoryImpl {
    pool: MySqlPool,
}

impl SubmissionRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const SUBMISSION_COLUMNS: &str = "id, restaurant_name, category, location, price_range, \
                                  recommended_menu, review, submitter_name, submitter_email, \
                                  status, restaurant_id, created_at, updated_at";

#[async_trait]
impl SubmissionRepository for SubmissionRepositoryImpl {
    async fn create(&self, submission: &Submission) -> Result<Submission> {
        let menu_json = serde_json::to_string(&submission.recommended_menu)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO submissions (id, restaurant_name, category, location, price_range,
                                     recommended_menu, review, submitter_name, submitter_email,
                                     status, restaurant_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(submission.id)
        .bind(&submission.restaurant_name)
        .bind(&submission.category)
        .bind(&submission.location)
        .bind(&submission.price_range)
        .bind(&menu_json)
        .bind(&submission.review)
        .bind(&submission.submitter_name)
        .bind(&submission.submitter_email)
        .bind(submission.status)
        .bind(submission.restaurant_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(submission.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create submission")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn list(&self, status: Option<SubmissionStatus>) -> Result<Vec<Submission>> {
        let submissions = match status {
            Some(status) => {
                sqlx::query_as::<_, Submission>(&format!(
                    "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE status = ? \
                     ORDER BY created_at DESC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Submission>(&format!(
                    "SELECT {SUBMISSION_COLUMNS} FROM submissions ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(submissions)
    }

    async fn update(&self, submission: &Submission) -> Result<Option<Submission>> {
        let menu_json = serde_json::to_string(&submission.recommended_menu)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            UPDATE submissions
            SET restaurant_name = ?, category = ?, location = ?, price_range = ?,
                recommended_menu = ?, review = ?, submitter_name = ?, submitter_email = ?,
                status = ?, restaurant_id = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&submission.restaurant_name)
        .bind(&submission.category)
        .bind(&submission.location)
        .bind(&submission.price_range)
        .bind(&menu_json)
        .bind(&submission.review)
        .bind(&submission.submitter_name)
        .bind(&submission.submitter_email)
        .bind(submission.status)
        .bind(submission.restaurant_id)
        .bind(submission.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(submission.id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
