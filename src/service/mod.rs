//! Business logic layer

pub mod auth;
pub mod oauth;
pub mod restaurant;
pub mod submission;

pub use auth::{AuthService, IssuedSession};
pub use oauth::OAuthService;
pub use restaurant::RestaurantService;
pub use submission::SubmissionService;
