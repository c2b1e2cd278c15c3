//! Authentication API handlers
//!
//! These endpoints answer with `{"success", "message", "data"}` rather than the
//! `{"data"}` / `{"error"}` envelope of the resource endpoints.

use crate::api::AuthResponse;
use crate::config::SessionConfig;
use crate::domain::{LoginInput, OAuthProvider, RegisterInput, User};
use crate::error::AppError;
use crate::middleware::session::{SessionContext, LOGIN_REQUIRED};
use crate::service::oauth::LOGIN_FAILED;
use crate::state::HasServices;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Cookie holding the OAuth `state` between the redirect and the callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Auth-envelope error: `{"success": false, "message": ...}`
#[derive(Debug)]
pub struct AuthError {
    status: StatusCode,
    message: String,
}

impl AuthError {
    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        let (status, message) = err.status_and_message();
        Self { status, message }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(AuthResponse::failure(self.message))).into_response()
    }
}

type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: User,
}

/// Create a local account and log it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterInput,
    responses(
        (status = 201, description = "Account created; session cookie set"),
        (status = 400, description = "Missing fields or password too short"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> AuthResult<impl IntoResponse> {
    let user = state.auth_service().register(input).await?;

    let session = state
        .auth_service()
        .create_session(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Session creation after registration failed");
            AuthError::internal("An error occurred while logging in after registration.")
        })?;

    let jar = jar.add(session_cookie(&state.config().session, session.token));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse::ok(
            Some("Registration complete."),
            Some(UserPayload { user }),
        )),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Logged in; session cookie set"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> AuthResult<impl IntoResponse> {
    let user = state.auth_service().verify_local_credentials(input).await?;

    let session = state
        .auth_service()
        .create_session(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Session creation failed");
            AuthError::internal("An error occurred while logging in.")
        })?;

    let jar = jar.add(session_cookie(&state.config().session, session.token));
    Ok((
        jar,
        Json(AuthResponse::ok(Some("Logged in."), Some(UserPayload { user }))),
    ))
}

/// End the current session and clear its cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse> {
    let session_config = &state.config().session;

    if let Some(token) = jar.get(&session_config.cookie_name).map(|c| c.value().to_string()) {
        state
            .auth_service()
            .destroy_session(&token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session deletion failed");
                AuthError::internal("An error occurred while deleting the session.")
            })?;
    }

    let jar = jar.remove(removal_cookie(session_config.cookie_name.clone(), "/"));
    Ok((jar, Json(AuthResponse::<()>::ok(Some("Logged out."), None))))
}

/// Current user behind the session cookie
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged-in user"),
        (status = 401, description = "Login required")
    )
)]
pub async fn me<S: HasServices>(session: SessionContext) -> AuthResult<impl IntoResponse> {
    let Some(user) = session.user() else {
        return Err(AuthError {
            status: StatusCode::UNAUTHORIZED,
            message: LOGIN_REQUIRED.to_string(),
        });
    };

    Ok(Json(AuthResponse::ok(
        None,
        Some(UserPayload { user: user.clone() }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/auth/google",
    tag = "Auth",
    responses((status = 303, description = "Redirect to Google consent page"))
)]
pub async fn google<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse> {
    oauth_start(&state, jar, OAuthProvider::Google)
}

#[utoipa::path(
    get,
    path = "/api/auth/naver",
    tag = "Auth",
    responses((status = 303, description = "Redirect to Naver consent page"))
)]
pub async fn naver<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse> {
    oauth_start(&state, jar, OAuthProvider::Naver)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    tag = "Auth",
    params(OAuthCallbackQuery),
    responses((status = 303, description = "Redirect to the client dashboard or login page"))
)]
pub async fn google_callback<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> impl IntoResponse {
    oauth_callback(&state, jar, OAuthProvider::Google, query).await
}

#[utoipa::path(
    get,
    path = "/api/auth/naver/callback",
    tag = "Auth",
    params(OAuthCallbackQuery),
    responses((status = 303, description = "Redirect to the client dashboard or login page"))
)]
pub async fn naver_callback<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> impl IntoResponse {
    oauth_callback(&state, jar, OAuthProvider::Naver, query).await
}

fn oauth_start<S: HasServices>(
    state: &S,
    jar: CookieJar,
    provider: OAuthProvider,
) -> AuthResult<(CookieJar, Redirect)> {
    let oauth_state = generate_state();
    let url = state
        .oauth_service()
        .authorization_url(provider, &oauth_state)?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, oauth_state))
        .path("/api/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config().session.secure_cookies);

    Ok((jar.add(cookie), Redirect::to(&url)))
}

async fn oauth_callback<S: HasServices>(
    state: &S,
    jar: CookieJar,
    provider: OAuthProvider,
    query: OAuthCallbackQuery,
) -> (CookieJar, Redirect) {
    let base = state.config().client_url.trim_end_matches('/').to_string();
    let login_error = |reason: &str| {
        Redirect::to(&format!(
            "{}/login?error={}",
            base,
            urlencoding::encode(reason)
        ))
    };

    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(removal_cookie(OAUTH_STATE_COOKIE.to_string(), "/api/auth"));

    match (&expected_state, &query.state) {
        (Some(expected), Some(actual)) if expected == actual => {}
        _ => {
            tracing::warn!(provider = %provider, "OAuth callback state mismatch");
            return (jar, login_error("invalid_state"));
        }
    }

    if let Some(error) = query.error.as_deref() {
        if error == "access_denied" {
            let message = query
                .error_description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            return (jar, login_error(&message));
        }
        tracing::error!(provider = %provider, error, "OAuth provider returned an error");
        return (jar, login_error("server_error"));
    }

    let (Some(code), Some(oauth_state)) = (query.code.as_deref(), query.state.as_deref()) else {
        return (jar, login_error(LOGIN_FAILED));
    };

    let user = match state
        .oauth_service()
        .authenticate(provider, code, oauth_state)
        .await
    {
        Ok(user) => user,
        Err(AppError::Unauthorized(message)) => {
            tracing::warn!(provider = %provider, %message, "OAuth login rejected");
            return (jar, login_error(&message));
        }
        Err(e) => {
            tracing::error!(provider = %provider, error = %e, "OAuth authentication error");
            return (jar, login_error("server_error"));
        }
    };

    match state.auth_service().create_session(user.id).await {
        Ok(session) => {
            tracing::info!(provider = %provider, user_id = %user.id, "OAuth login succeeded");
            let jar = jar.add(session_cookie(&state.config().session, session.token));
            (jar, Redirect::to(&format!("{}/dashboard", base)))
        }
        Err(e) => {
            tracing::error!(provider = %provider, user_id = %user.id, error = %e, "OAuth session creation failed");
            (jar, login_error("login_error"))
        }
    }
}

/// Browser-session cookie; the server enforces the session lifetime
fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .build()
}

fn removal_cookie(name: String, path: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path(path).build()
}

fn generate_state() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}
