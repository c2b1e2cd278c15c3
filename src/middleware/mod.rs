//! HTTP middleware for FoodTip Core
//!
//! - Session context extractor
//! - Request-id span and HTTP metrics layer
//! - Sanitized request spans for TraceLayer
//! - Error envelope normalization for framework rejections

pub mod error_response;
pub mod metrics;
pub mod session;
pub mod trace;

pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use session::SessionContext;
pub use trace::SanitizedMakeSpan;
