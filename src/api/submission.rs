//! Submission ("tip") API handlers

use crate::api::{parse_id, SuccessResponse};
use crate::domain::{CreateSubmissionInput, Submission, SubmissionStatus, UpdateSubmissionInput};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Submission not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListSubmissionsQuery {
    /// Only submissions with this status
    pub status: Option<SubmissionStatus>,
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    tag = "Submissions",
    params(ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions, newest first", body = Vec<Submission>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<impl IntoResponse> {
    let submissions = state.submission_service().list(query.status).await?;
    Ok(Json(SuccessResponse::new(submissions)))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    tag = "Submissions",
    params(("id" = String, Path, description = "Submission ID (UUID)")),
    responses(
        (status = 200, description = "Submission", body = Submission),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let submission = state.submission_service().get(id).await?;
    Ok(Json(SuccessResponse::new(submission)))
}

/// Report a new restaurant. Always starts out `pending`.
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "Submissions",
    request_body = CreateSubmissionInput,
    responses(
        (status = 201, description = "Submission created", body = Submission),
        (status = 400, description = "A required field is missing")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateSubmissionInput>,
) -> Result<impl IntoResponse> {
    let submission = state.submission_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(submission))))
}

/// Edit a submission. Setting `status` to `approved` or `rejected` promotes
/// the submission into the catalog or withdraws it.
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}",
    tag = "Submissions",
    params(("id" = String, Path, description = "Submission ID (UUID)")),
    request_body = UpdateSubmissionInput,
    responses(
        (status = 200, description = "Submission updated", body = Submission),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSubmissionInput>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let submission = state.submission_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(submission)))
}

#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    tag = "Submissions",
    params(("id" = String, Path, description = "Submission ID (UUID)")),
    responses(
        (status = 204, description = "Submission and its restaurant deleted"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn remove<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.submission_service().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
