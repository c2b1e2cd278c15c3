//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates all handler path annotations and domain schemas into a single
//! OpenAPI specification. Swagger UI is served in non-production environments.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FoodTip Core API",
        version = "0.3.0",
        description = "Restaurant catalog, user tips and moderation",
        license(name = "Proprietary"),
        contact(name = "FoodTip Team")
    ),
    tags(
        (name = "System", description = "Health checks and system status"),
        (name = "Restaurants", description = "Restaurant catalog"),
        (name = "Submissions", description = "User-reported restaurants and their moderation"),
        (name = "Auth", description = "Local accounts, sessions and social login"),
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::auth::UserPayload,
            crate::domain::Restaurant,
            crate::domain::CreateRestaurantInput,
            crate::domain::UpdateRestaurantInput,
            crate::domain::Submission,
            crate::domain::SubmissionStatus,
            crate::domain::CreateSubmissionInput,
            crate::domain::UpdateSubmissionInput,
            crate::domain::User,
            crate::domain::RegisterInput,
            crate::domain::LoginInput,
        )
    ),
    paths(
        // ── System ─────────────────────────────────────────────────
        crate::api::health::health,
        crate::api::health::ready,

        // ── Restaurants ────────────────────────────────────────────
        crate::api::restaurant::list,
        crate::api::restaurant::popular,
        crate::api::restaurant::get,
        crate::api::restaurant::create,
        crate::api::restaurant::update,
        crate::api::restaurant::delete,

        // ── Submissions ────────────────────────────────────────────
        crate::api::submission::list,
        crate::api::submission::get,
        crate::api::submission::create,
        crate::api::submission::update,
        crate::api::submission::remove,

        // ── Auth ───────────────────────────────────────────────────
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::me,
        crate::api::auth::google,
        crate::api::auth::google_callback,
        crate::api::auth::naver,
        crate::api::auth::naver_callback,
    ),
)]
pub struct ApiDoc;

/// Name of the session cookie security scheme
pub const SESSION_COOKIE_SCHEME: &str = "session_cookie";

impl ApiDoc {
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                SESSION_COOKIE_SCHEME.to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("connect.sid"))),
            );
        }
        doc
    }
}
