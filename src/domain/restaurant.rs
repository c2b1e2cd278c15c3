//! Restaurant domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Restaurant catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub location: String,
    pub price_range: String,
    pub rating: Option<f64>,
    pub description: String,
    #[sqlx(json)]
    pub recommended_menu: Vec<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Restaurant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            category: String::new(),
            location: String::new(),
            price_range: String::new(),
            rating: None,
            description: String::new(),
            recommended_menu: Vec::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a restaurant.
///
/// Only these fields are accepted from a request body; anything else is dropped.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantInput {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub recommended_menu: Option<Vec<String>>,
    pub image: Option<String>,
}

/// Input for updating a restaurant; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub recommended_menu: Option<Vec<String>>,
    pub image: Option<String>,
}

impl Restaurant {
    /// Apply an update on top of this record
    pub fn merged_with(&self, input: &UpdateRestaurantInput) -> Restaurant {
        Restaurant {
            id: self.id,
            name: input.name.clone().unwrap_or_else(|| self.name.clone()),
            category: input.category.clone().unwrap_or_else(|| self.category.clone()),
            location: input.location.clone().unwrap_or_else(|| self.location.clone()),
            price_range: input
                .price_range
                .clone()
                .unwrap_or_else(|| self.price_range.clone()),
            rating: input.rating.or(self.rating),
            description: input
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            recommended_menu: input
                .recommended_menu
                .clone()
                .unwrap_or_else(|| self.recommended_menu.clone()),
            image: input.image.clone().or_else(|| self.image.clone()),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
