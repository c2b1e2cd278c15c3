//! Submission ("tip") domain model

use super::restaurant::CreateRestaurantInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Moderation status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Unknown submission status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for SubmissionStatus {
    fn decode(
        value: sqlx::mysql::MySqlValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::MySql>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl sqlx::Type<sqlx::MySql> for SubmissionStatus {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for SubmissionStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// A user-reported candidate restaurant awaiting moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub restaurant_name: String,
    pub category: String,
    pub location: String,
    pub price_range: String,
    #[sqlx(json)]
    pub recommended_menu: Vec<String>,
    pub review: String,
    pub submitter_name: String,
    pub submitter_email: String,
    pub status: SubmissionStatus,
    /// Restaurant promoted from this submission. Cleared when it is rejected.
    pub restaurant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Submission {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            restaurant_name: String::new(),
            category: String::new(),
            location: String::new(),
            price_range: String::new(),
            recommended_menu: Vec::new(),
            review: String::new(),
            submitter_name: String::new(),
            submitter_email: String::new(),
            status: SubmissionStatus::Pending,
            restaurant_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Submission {
    /// Restaurant fields carried over when the submission is approved
    pub fn to_restaurant_input(&self) -> CreateRestaurantInput {
        CreateRestaurantInput {
            name: Some(self.restaurant_name.clone()),
            category: Some(self.category.clone()),
            location: Some(self.location.clone()),
            price_range: Some(self.price_range.clone()),
            rating: None,
            description: Some(self.review.clone()),
            recommended_menu: Some(self.recommended_menu.clone()),
            image: None,
        }
    }

    /// Merge a partial update into this submission.
    ///
    /// Present, non-null fields win. `recommendedMenu` is only replaced by a JSON
    /// array; strings and other values leave the stored menu untouched.
    /// `restaurant_id` is always carried over.
    pub fn merged_with(&self, input: &UpdateSubmissionInput) -> Submission {
        let recommended_menu = match &input.recommended_menu {
            Some(Value::Array(items)) => menu_from_array(items),
            _ => self.recommended_menu.clone(),
        };

        Submission {
            id: self.id,
            restaurant_name: pick(&input.restaurant_name, &self.restaurant_name),
            category: pick(&input.category, &self.category),
            location: pick(&input.location, &self.location),
            price_range: pick(&input.price_range, &self.price_range),
            recommended_menu,
            review: pick(&input.review, &self.review),
            submitter_name: pick(&input.submitter_name, &self.submitter_name),
            submitter_email: pick(&input.submitter_email, &self.submitter_email),
            status: input.status.unwrap_or(self.status),
            restaurant_id: self.restaurant_id,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

fn pick(incoming: &Option<String>, existing: &str) -> String {
    incoming.clone().unwrap_or_else(|| existing.to_string())
}

/// Request body for creating a submission.
///
/// Required fields are optional here so the service can report which one is missing.
/// Text fields also take numbers and booleans as their literal text.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionInput {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub restaurant_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    /// Array of strings or comma-separated text
    #[schema(value_type = Object)]
    pub recommended_menu: Option<Value>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 10000))]
    pub review: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub submitter_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub submitter_email: Option<String>,
}

/// Partial update of a submission. There is deliberately no `restaurantId` field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionInput {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub restaurant_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[schema(value_type = Object)]
    pub recommended_menu: Option<Value>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 10000))]
    pub review: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub submitter_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(length(max = 255))]
    pub submitter_email: Option<String>,
    pub status: Option<SubmissionStatus>,
}

/// Read a scalar as text. Null reads as absent; arrays and objects are rejected.
fn text_field<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(serde::de::Error::custom("expected a text value")),
    }
}

/// Fields checked, in order, when a submission is created
pub const REQUIRED_SUBMISSION_FIELDS: [&str; 3] = ["restaurantName", "category", "location"];

impl CreateSubmissionInput {
    /// Name of the first required field that is absent or empty
    pub fn first_missing_field(&self) -> Option<&'static str> {
        let values = [&self.restaurant_name, &self.category, &self.location];
        REQUIRED_SUBMISSION_FIELDS
            .iter()
            .zip(values)
            .find(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
    }
}

/// Normalize a submitted menu.
///
/// Arrays are taken as they are, comma-separated text is split and trimmed with
/// empty entries dropped, and every other value yields an empty menu.
pub fn normalize_menu(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => menu_from_array(items),
        Some(Value::String(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// String elements are kept verbatim; other elements are stored as their JSON text.
fn menu_from_array(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
