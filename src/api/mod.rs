//! REST API handlers and shared response types

pub mod auth;
pub mod health;
pub mod metrics;
pub mod restaurant;
pub mod submission;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success envelope for resource endpoints: `{"data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Envelope used by the auth endpoints: `{"success", "message"?, "data"?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AuthResponse<T> {
    pub fn ok(message: Option<&str>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.map(str::to_string),
            data,
        }
    }
}

impl AuthResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Parse a path id. Anything that is not a UUID cannot name a stored record,
/// so it is reported the same way as a missing one.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}
