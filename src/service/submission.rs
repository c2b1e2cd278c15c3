//! Submission moderation workflow
//!
//! Approving a submission promotes it into the restaurant catalog; rejecting or
//! removing it takes the promoted restaurant back out. The restaurant side
//! effect is applied before the submission is persisted and the two writes do
//! not share a transaction. A restaurant created by a failed approval is
//! deleted again on a best-effort basis.

use crate::domain::{
    normalize_menu, CreateSubmissionInput, Submission, SubmissionStatus, UpdateSubmissionInput,
};
use crate::error::{AppError, Result};
use crate::repository::{RestaurantRepository, SubmissionRepository};
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct SubmissionService<S: SubmissionRepository, R: RestaurantRepository> {
    submission_repo: Arc<S>,
    restaurant_repo: Arc<R>,
}

/// Restaurant mutation applied while updating a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Promotion {
    None,
    Created(Uuid),
    Deleted(Uuid),
}

impl<S: SubmissionRepository, R: RestaurantRepository> SubmissionService<S, R> {
    pub fn new(submission_repo: Arc<S>, restaurant_repo: Arc<R>) -> Self {
        Self {
            submission_repo,
            restaurant_repo,
        }
    }

    pub async fn list(&self, status: Option<SubmissionStatus>) -> Result<Vec<Submission>> {
        self.submission_repo.list(status).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Submission> {
        self.submission_repo
            .find_by_id(id)
            .await?
            .ok_or_else(submission_not_found)
    }

    pub async fn create(&self, input: CreateSubmissionInput) -> Result<Submission> {
        if let Some(field) = input.first_missing_field() {
            return Err(AppError::Validation(format!("'{}' is required", field)));
        }
        input.validate()?;

        let now = Utc::now();
        let submission = Submission {
            id: Uuid::new_v4(),
            restaurant_name: input.restaurant_name.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            price_range: input.price_range.unwrap_or_default(),
            recommended_menu: normalize_menu(input.recommended_menu.as_ref()),
            review: input.review.unwrap_or_default(),
            submitter_name: input.submitter_name.unwrap_or_default(),
            submitter_email: input.submitter_email.unwrap_or_default(),
            status: SubmissionStatus::Pending,
            restaurant_id: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.submission_repo.create(&submission).await?;
        counter!("foodtip_submissions_created_total").increment(1);
        info!(submission_id = %created.id, "Submission created");
        Ok(created)
    }

    /// Merge `input` into the stored submission and apply status side effects.
    ///
    /// `approved` without a linked restaurant creates one; repeated approvals
    /// reuse the existing link. `rejected` with a linked restaurant deletes it
    /// and clears the link.
    pub async fn update(&self, id: Uuid, input: UpdateSubmissionInput) -> Result<Submission> {
        input.validate()?;
        let existing = self.get(id).await?;
        let mut merged = existing.merged_with(&input);

        let promotion = self.apply_transition(&mut merged).await?;

        let persisted = match self.submission_repo.update(&merged).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(submission_not_found()),
            Err(e) => Err(e),
        };

        match persisted {
            Ok(updated) => {
                match promotion {
                    Promotion::Created(restaurant_id) => {
                        counter!("foodtip_submission_transitions_total", "status" => "approved")
                            .increment(1);
                        info!(submission_id = %id, restaurant_id = %restaurant_id, "Submission approved");
                    }
                    Promotion::Deleted(restaurant_id) => {
                        counter!("foodtip_submission_transitions_total", "status" => "rejected")
                            .increment(1);
                        info!(submission_id = %id, restaurant_id = %restaurant_id, "Submission rejected");
                    }
                    Promotion::None => {}
                }
                Ok(updated)
            }
            Err(e) => {
                self.compensate(id, promotion).await;
                Err(e)
            }
        }
    }

    /// Delete a submission and the restaurant promoted from it, if any
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let existing = self.get(id).await?;

        if let Some(restaurant_id) = existing.restaurant_id {
            if !self.restaurant_repo.delete(restaurant_id).await? {
                warn!(
                    submission_id = %id,
                    restaurant_id = %restaurant_id,
                    "Linked restaurant already removed"
                );
            }
        }

        if !self.submission_repo.delete(id).await? {
            return Err(submission_not_found());
        }
        info!(submission_id = %id, "Submission removed");
        Ok(())
    }

    async fn apply_transition(&self, submission: &mut Submission) -> Result<Promotion> {
        match (submission.status, submission.restaurant_id) {
            (SubmissionStatus::Approved, None) => {
                let restaurant = self
                    .restaurant_repo
                    .create(&submission.to_restaurant_input())
                    .await?;
                submission.restaurant_id = Some(restaurant.id);
                Ok(Promotion::Created(restaurant.id))
            }
            (SubmissionStatus::Rejected, Some(restaurant_id)) => {
                if !self.restaurant_repo.delete(restaurant_id).await? {
                    warn!(
                        submission_id = %submission.id,
                        restaurant_id = %restaurant_id,
                        "Linked restaurant already removed"
                    );
                }
                submission.restaurant_id = None;
                Ok(Promotion::Deleted(restaurant_id))
            }
            _ => Ok(Promotion::None),
        }
    }

    async fn compensate(&self, submission_id: Uuid, promotion: Promotion) {
        match promotion {
            Promotion::Created(restaurant_id) => {
                match self.restaurant_repo.delete(restaurant_id).await {
                    Ok(_) => warn!(
                        submission_id = %submission_id,
                        restaurant_id = %restaurant_id,
                        "Submission update failed; promoted restaurant rolled back"
                    ),
                    Err(e) => error!(
                        submission_id = %submission_id,
                        restaurant_id = %restaurant_id,
                        error = %e,
                        "Submission update failed and promoted restaurant could not be removed"
                    ),
                }
            }
            Promotion::Deleted(restaurant_id) => error!(
                submission_id = %submission_id,
                restaurant_id = %restaurant_id,
                "Submission update failed after its restaurant was deleted; stored link is dangling"
            ),
            Promotion::None => {}
        }
    }
}

fn submission_not_found() -> AppError {
    AppError::NotFound("Submission not found".to_string())
}
