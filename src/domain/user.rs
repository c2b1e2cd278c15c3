//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Minimum accepted length for local passwords
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Argon2 PHC string; only local accounts have one
    #[serde(skip)]
    pub password_hash: Option<String>,
    /// "local", "google" or "naver"
    pub provider: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: String::new(),
            name: String::new(),
            password_hash: None,
            provider: "local".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for persisting a new user
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub provider: String,
}

/// Registration request body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Local login request body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}
