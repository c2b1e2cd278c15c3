//! Submission API HTTP Handler Tests
//!
//! Covers creation, menu normalization, and the approve / reject / remove
//! side effects on the restaurant catalog.

use super::{build_test_router, delete_json, get_json, patch_json, post_json, TestAppState};
use crate::api::create_test_submission;
use axum::http::StatusCode;
use foodtip_core::api::SuccessResponse;
use foodtip_core::domain::{Submission, SubmissionStatus};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_submission(app: &axum::Router, payload: Value) -> (StatusCode, Value) {
    let (status, body): (StatusCode, Option<Value>) =
        post_json(app, "/api/submissions", &payload).await;
    (status, body.unwrap_or(Value::Null))
}

async fn set_status(app: &axum::Router, id: Uuid, status: &str) -> Submission {
    let (code, body): (StatusCode, Option<SuccessResponse<Submission>>) = patch_json(
        app,
        &format!("/api/submissions/{}", id),
        &json!({ "status": status }),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    body.unwrap().data
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_submission_defaults() {
    let state = TestAppState::default();
    let app = build_test_router(state.clone());

    let (status, body) = create_submission(
        &app,
        json!({ "restaurantName": "Joe's", "category": "diner", "location": "Main St" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["status"], "pending");
    assert_eq!(data["recommendedMenu"], json!([]));
    assert_eq!(data["restaurantId"], Value::Null);
    assert_eq!(data["priceRange"], "");
    assert_eq!(data["review"], "");
    assert_eq!(state.restaurant_repo.count().await, 0);
}

#[tokio::test]
async fn test_create_submission_forces_pending_status() {
    let app = build_test_router(TestAppState::default());

    let (status, body) = create_submission(
        &app,
        json!({
            "restaurantName": "Joe's",
            "category": "diner",
            "location": "Main St",
            "status": "approved",
            "restaurantId": Uuid::new_v4()
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["restaurantId"], Value::Null);
}

#[rstest]
#[case(json!({ "category": "diner", "location": "Main St" }), "'restaurantName' is required")]
#[case(json!({ "restaurantName": "", "category": "diner" }), "'restaurantName' is required")]
#[case(json!({ "restaurantName": "Joe's", "location": "Main St" }), "'category' is required")]
#[case(json!({ "restaurantName": "Joe's", "category": "diner", "location": "" }), "'location' is required")]
#[case(json!({}), "'restaurantName' is required")]
#[case(json!({ "category": "diner", "location": "Main St", "priceRange": 2 }), "'restaurantName' is required")]
#[tokio::test]
async fn test_create_submission_reports_first_missing_field(
    #[case] payload: Value,
    #[case] message: &str,
) {
    let app = build_test_router(TestAppState::default());

    let (status, body) = create_submission(&app, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": { "message": message } }));
}

#[tokio::test]
async fn test_create_submission_stores_numbers_as_text() {
    let app = build_test_router(TestAppState::default());

    let (status, body) = create_submission(
        &app,
        json!({
            "restaurantName": "Joe's",
            "category": "diner",
            "location": "Main St",
            "priceRange": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["priceRange"], "2");
}

#[tokio::test]
async fn test_create_submission_oversized_field_is_bad_request() {
    let state = TestAppState::default();
    let app = build_test_router(state.clone());

    let (status, body) = create_submission(
        &app,
        json!({
            "restaurantName": "Joe's",
            "category": "d".repeat(101),
            "location": "Main St"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());
    let (_, listed): (StatusCode, Option<Value>) = get_json(&app, "/api/submissions").await;
    assert_eq!(listed.unwrap()["data"], json!([]));
}

#[tokio::test]
async fn test_create_submission_structured_text_field_is_bad_request() {
    let app = build_test_router(TestAppState::default());

    let (status, body) = create_submission(
        &app,
        json!({
            "restaurantName": ["Joe's"],
            "category": "diner",
            "location": "Main St"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": { "message": "Invalid request body" } }));
}

#[rstest]
#[case(json!("a, b, ,c"), json!(["a", "b", "c"]))]
#[case(json!(["x", "y"]), json!(["x", "y"]))]
#[case(json!(null), json!([]))]
#[case(json!(42), json!([]))]
#[tokio::test]
async fn test_create_submission_normalizes_menu(#[case] menu: Value, #[case] expected: Value) {
    let app = build_test_router(TestAppState::default());

    let (status, body) = create_submission(
        &app,
        json!({
            "restaurantName": "Joe's",
            "category": "diner",
            "location": "Main St",
            "recommendedMenu": menu
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["recommendedMenu"], expected);
}

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn test_list_submissions_with_status_filter() {
    let state = TestAppState::default();
    state
        .submission_repo
        .add_submission(create_test_submission("A", SubmissionStatus::Pending))
        .await;
    state
        .submission_repo
        .add_submission(create_test_submission("B", SubmissionStatus::Approved))
        .await;
    state
        .submission_repo
        .add_submission(create_test_submission("C", SubmissionStatus::Pending))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Submission>>>) =
        get_json(&app, "/api/submissions").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body
        .unwrap()
        .data
        .into_iter()
        .map(|s| s.restaurant_name)
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Submission>>>) =
        get_json(&app, "/api/submissions?status=pending").await;
    assert_eq!(status, StatusCode::OK);
    let data = body.unwrap().data;
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|s| s.status == SubmissionStatus::Pending));
}

#[tokio::test]
async fn test_list_submissions_unknown_status_is_bad_request() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/submissions?status=archived").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"]["message"].is_string());
}

#[tokio::test]
async fn test_get_submission_not_found() {
    let app = build_test_router(TestAppState::default());

    for path in [
        format!("/api/submissions/{}", Uuid::new_v4()),
        "/api/submissions/42".to_string(),
    ] {
        let (status, body): (StatusCode, Option<Value>) = get_json(&app, &path).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body.unwrap(),
            json!({ "error": { "message": "Submission not found" } })
        );
    }
}

// ============================================================================
// Update: approve / reject
// ============================================================================

#[tokio::test]
async fn test_approve_creates_exactly_one_restaurant() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let approved = set_status(&app, id, "approved").await;

    assert_eq!(approved.status, SubmissionStatus::Approved);
    let restaurant_id = approved.restaurant_id.expect("restaurant linked");
    assert_eq!(state.restaurant_repo.count().await, 1);

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/restaurants/{}", restaurant_id)).await;
    let restaurant = &body.unwrap()["data"];
    assert_eq!(restaurant["name"], "Joe's");
    assert_eq!(restaurant["category"], "diner");
    assert_eq!(restaurant["description"], "Great pie");
    assert_eq!(restaurant["recommendedMenu"], json!(["pie"]));
    assert_eq!(restaurant["rating"], Value::Null);

    // Approving again is idempotent
    let again = set_status(&app, id, "approved").await;
    assert_eq!(again.restaurant_id, Some(restaurant_id));
    assert_eq!(state.restaurant_repo.count().await, 1);
}

#[tokio::test]
async fn test_reject_approved_submission_deletes_restaurant() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let approved = set_status(&app, id, "approved").await;
    let restaurant_id = approved.restaurant_id.unwrap();

    let rejected = set_status(&app, id, "rejected").await;

    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.restaurant_id, None);
    assert!(!state.restaurant_repo.contains(restaurant_id).await);
    assert_eq!(state.restaurant_repo.count().await, 0);
}

#[tokio::test]
async fn test_reject_without_restaurant_leaves_catalog_alone() {
    let state = TestAppState::default();
    let bystander = crate::api::create_test_restaurant("Bystander", Some(3.0));
    state.restaurant_repo.add_restaurant(bystander).await;
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let rejected = set_status(&app, id, "rejected").await;

    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.restaurant_id, None);
    assert_eq!(state.restaurant_repo.count().await, 1);
}

#[tokio::test]
async fn test_return_to_pending_keeps_restaurant() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let approved = set_status(&app, id, "approved").await;
    let restaurant_id = approved.restaurant_id.unwrap();

    let pending = set_status(&app, id, "pending").await;

    assert_eq!(pending.status, SubmissionStatus::Pending);
    assert_eq!(pending.restaurant_id, Some(restaurant_id));
    assert!(state.restaurant_repo.contains(restaurant_id).await);
}

#[tokio::test]
async fn test_update_unknown_status_is_bad_request() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = patch_json(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({ "status": "archived" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"]["message"], "Invalid request body");
    assert_eq!(
        state.submission_repo.get(id).await.unwrap().status,
        SubmissionStatus::Pending
    );
}

#[tokio::test]
async fn test_update_oversized_field_is_bad_request() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let (status, _): (StatusCode, Option<Value>) = patch_json(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({ "priceRange": "$".repeat(51) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.submission_repo.get(id).await.unwrap().price_range, "");
}

#[tokio::test]
async fn test_update_merges_fields_and_ignores_restaurant_id() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<SuccessResponse<Submission>>) = patch_json(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({
            "review": "",
            "location": null,
            "recommendedMenu": "not, an, array",
            "restaurantId": Uuid::new_v4()
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap().data;
    assert_eq!(updated.review, "");
    assert_eq!(updated.location, "Main St");
    assert_eq!(updated.recommended_menu, vec!["pie".to_string()]);
    assert_eq!(updated.restaurant_id, None);
    assert_eq!(state.submission_repo.get(id).await.unwrap().review, "");
}

#[tokio::test]
async fn test_update_submission_not_found() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) = patch_json(
        &app,
        &format!("/api/submissions/{}", Uuid::new_v4()),
        &json!({ "status": "approved" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"]["message"], "Submission not found");
}

// ============================================================================
// Remove
// ============================================================================

#[tokio::test]
async fn test_remove_submission_with_restaurant_deletes_both() {
    let state = TestAppState::default();
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let restaurant_id = set_status(&app, id, "approved").await.restaurant_id.unwrap();

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/submissions/{}", id)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.submission_repo.get(id).await.is_none());
    assert!(!state.restaurant_repo.contains(restaurant_id).await);
}

#[tokio::test]
async fn test_remove_submission_without_restaurant_deletes_only_submission() {
    let state = TestAppState::default();
    state
        .restaurant_repo
        .add_restaurant(crate::api::create_test_restaurant("Bystander", None))
        .await;
    let submission = create_test_submission("Joe's", SubmissionStatus::Pending);
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/submissions/{}", id)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.submission_repo.get(id).await.is_none());
    assert_eq!(state.restaurant_repo.count().await, 1);
}

#[tokio::test]
async fn test_remove_submission_with_missing_restaurant_still_succeeds() {
    let state = TestAppState::default();
    let mut submission = create_test_submission("Joe's", SubmissionStatus::Approved);
    submission.restaurant_id = Some(Uuid::new_v4());
    let id = submission.id;
    state.submission_repo.add_submission(submission).await;
    let app = build_test_router(state.clone());

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/submissions/{}", id)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.submission_repo.get(id).await.is_none());
}

#[tokio::test]
async fn test_remove_submission_not_found() {
    let app = build_test_router(TestAppState::default());

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/submissions/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
