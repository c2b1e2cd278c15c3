//! Restaurant repository

use crate::domain::{CreateRestaurantInput, Restaurant};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn create(&self, input: &CreateRestaurantInput) -> Result<Restaurant>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>>;
    async fn list(&self) -> Result<Vec<Restaurant>>;
    /// Highest rated first, unrated last
    async fn list_popular(&self, limit: i64) -> Result<Vec<Restaurant>>;
    /// Persist a fully merged record. `None` when the row no longer exists.
    async fn update(&self, restaurant: &Restaurant) -> Result<Option<Restaurant>>;
    /// Returns whether a row was deleted
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct RestaurantRepositoryImpl {
    pool: MySqlPool,
}

impl RestaurantRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const RESTAURANT_COLUMNS: &str = "id, name, category, location, price_range, rating, description, \
                                  recommended_menu, image, created_at, updated_at";

#[async_trait]
impl RestaurantRepository for RestaurantRepositoryImpl {
    async fn create(&self, input: &CreateRestaurantInput) -> Result<Restaurant> {
        let id = Uuid::new_v4();
        let menu = input.recommended_menu.clone().unwrap_or_default();
        let menu_json = serde_json::to_string(&menu).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO restaurants (id, name, category, location, price_range, rating,
                                     description, recommended_menu, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.name.as_deref().unwrap_or_default())
        .bind(input.category.as_deref().unwrap_or_default())
        .bind(input.location.as_deref().unwrap_or_default())
        .bind(input.price_range.as_deref().unwrap_or_default())
        .bind(input.rating)
        .bind(input.description.as_deref().unwrap_or_default())
        .bind(&menu_json)
        .bind(&input.image)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create restaurant")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    async fn list(&self) -> Result<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }

    async fn list_popular(&self, limit: i64) -> Result<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants
            ORDER BY rating IS NULL, rating DESC, created_at DESC
            LIMIT ?
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }

    async fn update(&self, restaurant: &Restaurant) -> Result<Option<Restaurant>> {
        let menu_json = serde_json::to_string(&restaurant.recommended_menu)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            UPDATE restaurants
            SET name = ?, category = ?, location = ?, price_range = ?, rating = ?,
                description = ?, recommended_menu = ?, image = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&restaurant.name)
        .bind(&restaurant.category)
        .bind(&restaurant.location)
        .bind(&restaurant.price_range)
        .bind(restaurant.rating)
        .bind(&restaurant.description)
        .bind(&menu_json)
        .bind(&restaurant.image)
        .bind(restaurant.id)
        .execute(&self.pool)
        .await?;

        // rows_affected is 0 for unchanged rows on MySQL, so existence is decided by a re-read
        self.find_by_id(restaurant.id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
