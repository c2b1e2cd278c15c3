//! Application state trait for dependency injection
//!
//! Handlers are generic over `HasServices`, so the same router runs on the
//! production `AppState` (MySQL repositories) and on in-memory test state.

use crate::config::Config;
use crate::repository::{
    LinkedIdentityRepository, RestaurantRepository, SessionRepository, SubmissionRepository,
    UserRepository,
};
use crate::service::{AuthService, OAuthService, RestaurantService, SubmissionService};

pub trait HasServices: Clone + Send + Sync + 'static {
    type RestaurantRepo: RestaurantRepository + 'static;
    type SubmissionRepo: SubmissionRepository + 'static;
    type UserRepo: UserRepository + 'static;
    type SessionRepo: SessionRepository + 'static;
    type LinkedIdentityRepo: LinkedIdentityRepository + 'static;

    fn config(&self) -> &Config;

    fn restaurant_service(&self) -> &RestaurantService<Self::RestaurantRepo>;

    fn submission_service(&self)
        -> &SubmissionService<Self::SubmissionRepo, Self::RestaurantRepo>;

    fn auth_service(&self) -> &AuthService<Self::UserRepo, Self::SessionRepo>;

    fn oauth_service(&self) -> &OAuthService<Self::UserRepo, Self::LinkedIdentityRepo>;

    /// Whether the backing store answers queries
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
