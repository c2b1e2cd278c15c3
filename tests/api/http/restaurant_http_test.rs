//! Restaurant API HTTP Handler Tests

use super::{build_test_router, delete_json, get_json, patch_json, post_json, TestAppState};
use crate::api::create_test_restaurant;
use axum::http::StatusCode;
use foodtip_core::api::SuccessResponse;
use foodtip_core::domain::Restaurant;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn test_list_restaurants_newest_first() {
    let state = TestAppState::default();
    for name in ["First", "Second", "Third"] {
        state
            .restaurant_repo
            .add_restaurant(create_test_restaurant(name, None))
            .await;
    }
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Restaurant>>>) =
        get_json(&app, "/api/restaurants").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body.unwrap().data.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_get_restaurant() {
    let state = TestAppState::default();
    let restaurant = create_test_restaurant("Joe's", Some(4.5));
    let id = restaurant.id;
    state.restaurant_repo.add_restaurant(restaurant).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/restaurants/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"]["id"], id.to_string());
    assert_eq!(body["data"]["priceRange"], "$$");
    assert_eq!(body["data"]["rating"], 4.5);
}

#[tokio::test]
async fn test_get_restaurant_not_found() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/restaurants/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "error": { "message": "Restaurant not found" } }));
}

#[tokio::test]
async fn test_get_restaurant_malformed_id_is_not_found() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/restaurants/not-a-uuid").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"]["message"], "Restaurant not found");
}

// ============================================================================
// Popular
// ============================================================================

#[tokio::test]
async fn test_popular_orders_by_rating_with_unrated_last() {
    let state = TestAppState::default();
    for (name, rating) in [
        ("Unrated", None),
        ("Good", Some(4.0)),
        ("Best", Some(4.9)),
        ("Okay", Some(3.1)),
    ] {
        state
            .restaurant_repo
            .add_restaurant(create_test_restaurant(name, rating))
            .await;
    }
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Restaurant>>>) =
        get_json(&app, "/api/restaurants/popular").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body.unwrap().data.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Best", "Good", "Okay", "Unrated"]);
}

#[tokio::test]
async fn test_popular_defaults_to_five_and_respects_limit() {
    let state = TestAppState::default();
    for i in 0..8 {
        state
            .restaurant_repo
            .add_restaurant(create_test_restaurant(&format!("R{}", i), Some(i as f64 / 2.0)))
            .await;
    }
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<SuccessResponse<Vec<Restaurant>>>) =
        get_json(&app, "/api/restaurants/popular").await;
    assert_eq!(body.unwrap().data.len(), 5);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Restaurant>>>) =
        get_json(&app, "/api/restaurants/popular?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let data = body.unwrap().data;
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].name, "R7");
    assert_eq!(data[1].name, "R6");
}

#[tokio::test]
async fn test_popular_rejects_invalid_limit() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/restaurants/popular?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.unwrap()["error"]["message"],
        "'limit' must be a positive integer"
    );

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/restaurants/popular?limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"]["message"].is_string());
}

// ============================================================================
// Create / Update / Delete
// ============================================================================

#[tokio::test]
async fn test_create_restaurant_ignores_unknown_fields() {
    let state = TestAppState::default();
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/restaurants",
        &json!({
            "name": "Joe's",
            "category": "diner",
            "rating": 4.2,
            "recommendedMenu": ["pie"],
            "ownerId": "ignored"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body.unwrap()["data"];
    assert_eq!(data["name"], "Joe's");
    assert_eq!(data["recommendedMenu"], json!(["pie"]));
    assert!(data.get("ownerId").is_none());
    assert_eq!(state.restaurant_repo.count().await, 1);
}

#[tokio::test]
async fn test_create_restaurant_requires_name() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/restaurants", &json!({ "category": "diner" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"]["message"], "'name' is required");
}

#[tokio::test]
async fn test_create_restaurant_rejects_out_of_range_rating() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/restaurants",
        &json!({ "name": "Joe's", "rating": 9 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"]["message"].is_string());
}

#[tokio::test]
async fn test_create_restaurant_malformed_json() {
    let app = build_test_router(TestAppState::default());

    let response = super::send(
        &app,
        axum::http::Method::POST,
        "/api/restaurants",
        Some(json!("just a string")),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.unwrap()["error"]["message"].is_string());
}

#[tokio::test]
async fn test_create_restaurant_wrong_field_type_is_bad_request() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/restaurants",
        &json!({ "name": "Joe's", "rating": "excellent" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_update_restaurant_merges_fields() {
    let state = TestAppState::default();
    let restaurant = create_test_restaurant("Joe's", Some(4.0));
    let id = restaurant.id;
    state.restaurant_repo.add_restaurant(restaurant).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Restaurant>>) = patch_json(
        &app,
        &format!("/api/restaurants/{}", id),
        &json!({ "category": "cafe" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap().data;
    assert_eq!(updated.name, "Joe's");
    assert_eq!(updated.category, "cafe");
    assert_eq!(updated.rating, Some(4.0));
}

#[tokio::test]
async fn test_update_restaurant_not_found() {
    let app = build_test_router(TestAppState::default());

    let (status, _): (StatusCode, Option<Value>) = patch_json(
        &app,
        &format!("/api/restaurants/{}", Uuid::new_v4()),
        &json!({ "name": "x" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_restaurant() {
    let state = TestAppState::default();
    let restaurant = create_test_restaurant("Joe's", None);
    let id = restaurant.id;
    state.restaurant_repo.add_restaurant(restaurant).await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/restaurants/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
    assert!(!state.restaurant_repo.contains(id).await);

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &format!("/api/restaurants/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
