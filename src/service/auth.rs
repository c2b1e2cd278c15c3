//! Local accounts and server-side sessions

use crate::config::SessionConfig;
use crate::domain::{
    CreateSessionInput, CreateUserInput, LoginInput, RegisterInput, User, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, Result};
use crate::repository::{SessionRepository, UserRepository};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use metrics::counter;
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

pub const MISSING_CREDENTIALS: &str = "Missing credentials";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const SOCIAL_ACCOUNT: &str = "This account signs in with Google or Naver.";

/// A freshly issued session. `token` is what goes into the cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    session_secret: String,
    session_ttl: Duration,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, session: &SessionConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            session_secret: session.secret.clone(),
            session_ttl: Duration::seconds(session.ttl_secs),
        }
    }

    /// Create a local account
    pub async fn register(&self, input: RegisterInput) -> Result<User> {
        let (email, password, name) = match (
            non_empty(input.email),
            non_empty(input.password),
            non_empty(input.name),
        ) {
            (Some(email), Some(password), Some(name)) => (email, password, name),
            _ => {
                return Err(AppError::BadRequest(
                    "Email, password and name are required.".to_string(),
                ))
            }
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;
        let user = self
            .user_repo
            .create(&CreateUserInput {
                email,
                name,
                password_hash: Some(password_hash),
                provider: "local".to_string(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "Local account registered");
        Ok(user)
    }

    /// Local login strategy. Failures are `Unauthorized` carrying the message
    /// shown to the client.
    pub async fn verify_local_credentials(&self, input: LoginInput) -> Result<User> {
        let (email, password) = match (non_empty(input.email), non_empty(input.password)) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(login_failure(MISSING_CREDENTIALS)),
        };

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => return Err(login_failure(INVALID_CREDENTIALS)),
        };

        let Some(stored_hash) = user.password_hash.as_deref() else {
            return Err(login_failure(SOCIAL_ACCOUNT));
        };

        if !verify_password(&password, stored_hash)? {
            return Err(login_failure(INVALID_CREDENTIALS));
        }

        counter!("foodtip_auth_login_total", "provider" => "local", "result" => "success")
            .increment(1);
        Ok(user)
    }

    /// Start a session for `user_id`; only the token's HMAC is stored
    pub async fn create_session(&self, user_id: Uuid) -> Result<IssuedSession> {
        let token = generate_session_token();
        let expires_at = Utc::now() + self.session_ttl;

        self.session_repo
            .create(&CreateSessionInput {
                user_id,
                token_hash: hash_token(&token, self.session_secret.as_bytes())?,
                expires_at,
            })
            .await?;

        Ok(IssuedSession {
            token,
            user_id,
            expires_at,
        })
    }

    /// User behind a session token. Unknown and expired tokens resolve to `None`.
    pub async fn resolve_session(&self, token: &str) -> Result<Option<User>> {
        let token_hash = hash_token(token, self.session_secret.as_bytes())?;

        let Some(session) = self.session_repo.find_by_token_hash(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.session_repo.delete_by_token_hash(&token_hash).await?;
            return Ok(None);
        }

        self.user_repo.find_by_id(session.user_id).await
    }

    pub async fn destroy_session(&self, token: &str) -> Result<()> {
        let token_hash = hash_token(token, self.session_secret.as_bytes())?;
        self.session_repo.delete_by_token_hash(&token_hash).await
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        self.session_repo.delete_expired().await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn login_failure(message: &str) -> AppError {
    counter!("foodtip_auth_login_total", "provider" => "local", "result" => "failure")
        .increment(1);
    AppError::Unauthorized(message.to_string())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 32 random bytes, URL-safe base64
fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Deterministic HMAC-SHA256 so sessions can be looked up by hash
fn hash_token(token: &str, key: &[u8]) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init error: {}", e)))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
