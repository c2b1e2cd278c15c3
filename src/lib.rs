//! FoodTip Core - restaurant catalog and tip moderation backend
//!
//! Provides the REST API for browsing restaurants, reporting new ones as
//! submissions, moderating those submissions, and signing in with a local
//! account or a social provider.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
