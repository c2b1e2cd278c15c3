//! Restaurant catalog API handlers

use crate::api::{parse_id, SuccessResponse};
use crate::domain::{CreateRestaurantInput, Restaurant, UpdateRestaurantInput};
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

const NOT_FOUND: &str = "Restaurant not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PopularQuery {
    /// Maximum number of restaurants (default 5, at most 100)
    pub limit: Option<i64>,
}

/// List all restaurants, newest first
#[utoipa::path(
    get,
    path = "/api/restaurants",
    tag = "Restaurants",
    responses(
        (status = 200, description = "All restaurants", body = Vec<Restaurant>)
    )
)]
pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let restaurants = state.restaurant_service().list().await?;
    Ok(Json(SuccessResponse::new(restaurants)))
}

/// Highest rated restaurants
#[utoipa::path(
    get,
    path = "/api/restaurants/popular",
    tag = "Restaurants",
    params(PopularQuery),
    responses(
        (status = 200, description = "Popular restaurants", body = Vec<Restaurant>),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn popular<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<PopularQuery>,
) -> Result<impl IntoResponse> {
    let restaurants = state.restaurant_service().popular(query.limit).await?;
    Ok(Json(SuccessResponse::new(restaurants)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = String, Path, description = "Restaurant ID (UUID)")),
    responses(
        (status = 200, description = "Restaurant", body = Restaurant),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let restaurant = state.restaurant_service().get(id).await?;
    Ok(Json(SuccessResponse::new(restaurant)))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    tag = "Restaurants",
    request_body = CreateRestaurantInput,
    responses(
        (status = 201, description = "Restaurant created", body = Restaurant),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateRestaurantInput>,
) -> Result<impl IntoResponse> {
    let restaurant = state.restaurant_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(restaurant))))
}

#[utoipa::path(
    patch,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = String, Path, description = "Restaurant ID (UUID)")),
    request_body = UpdateRestaurantInput,
    responses(
        (status = 200, description = "Restaurant updated", body = Restaurant),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRestaurantInput>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let restaurant = state.restaurant_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(restaurant)))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = String, Path, description = "Restaurant ID (UUID)")),
    responses(
        (status = 204, description = "Restaurant deleted"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.restaurant_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
