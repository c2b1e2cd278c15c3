//! Restaurant catalog business logic

use crate::domain::{CreateRestaurantInput, Restaurant, UpdateRestaurantInput};
use crate::error::{AppError, Result};
use crate::repository::RestaurantRepository;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Number of restaurants returned by the popular query when no limit is given
pub const DEFAULT_POPULAR_LIMIT: i64 = 5;
/// Upper bound for the popular query
pub const MAX_POPULAR_LIMIT: i64 = 100;

pub struct RestaurantService<R: RestaurantRepository> {
    repo: Arc<R>,
}

impl<R: RestaurantRepository> RestaurantService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Restaurant>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Restaurant> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(restaurant_not_found)
    }

    /// Highest rated restaurants, unrated last, newest first among equals
    pub async fn popular(&self, limit: Option<i64>) -> Result<Vec<Restaurant>> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
        if limit < 1 {
            return Err(AppError::BadRequest(
                "'limit' must be a positive integer".to_string(),
            ));
        }
        self.repo.list_popular(limit.min(MAX_POPULAR_LIMIT)).await
    }

    pub async fn create(&self, input: CreateRestaurantInput) -> Result<Restaurant> {
        if input.name.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::Validation("'name' is required".to_string()));
        }
        input.validate()?;

        let restaurant = self.repo.create(&input).await?;
        tracing::info!(restaurant_id = %restaurant.id, "Restaurant created");
        Ok(restaurant)
    }

    pub async fn update(&self, id: Uuid, input: UpdateRestaurantInput) -> Result<Restaurant> {
        input.validate()?;

        let existing = self.get(id).await?;
        let merged = existing.merged_with(&input);

        self.repo
            .update(&merged)
            .await?
            .ok_or_else(restaurant_not_found)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(restaurant_not_found());
        }
        tracing::info!(restaurant_id = %id, "Restaurant deleted");
        Ok(())
    }
}

fn restaurant_not_found() -> AppError {
    AppError::NotFound("Restaurant not found".to_string())
}
