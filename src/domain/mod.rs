//! Domain models for FoodTip Core

pub mod linked_identity;
pub mod restaurant;
pub mod session;
pub mod submission;
pub mod user;

pub use linked_identity::*;
pub use restaurant::*;
pub use session::*;
pub use submission::*;
pub use user::*;
