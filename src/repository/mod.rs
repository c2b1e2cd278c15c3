//! Data access layer (Repository pattern)

pub mod linked_identity;
pub mod restaurant;
pub mod session;
pub mod submission;
pub mod user;

pub use linked_identity::LinkedIdentityRepository;
pub use restaurant::RestaurantRepository;
pub use session::SessionRepository;
pub use submission::SubmissionRepository;
pub use user::UserRepository;
