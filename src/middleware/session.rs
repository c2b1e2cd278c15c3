//! Per-request session context
//!
//! `SessionContext` resolves the session cookie to the logged-in user and is
//! handed to handlers as an ordinary extractor argument.

use crate::domain::User;
use crate::state::HasServices;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

pub const LOGIN_REQUIRED: &str = "Login required.";

/// Session attached to the current request, if any
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Option<User>,
}

impl SessionContext {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: HasServices,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_name = &state.config().session.cookie_name;

        let Some(token) = jar
            .get(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
        else {
            return Ok(SessionContext::default());
        };

        match state.auth_service().resolve_session(&token).await {
            Ok(user) => Ok(SessionContext::new(user)),
            Err(e) => Err(e.into_response()),
        }
    }
}
