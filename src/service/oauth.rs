//! Google and Naver login via the OAuth 2.0 authorization-code flow

use crate::config::{OAuthConfig, OAuthProviderConfig};
use crate::domain::{
    CreateLinkedIdentityInput, CreateUserInput, ExternalProfile, OAuthProvider, User,
};
use crate::error::{AppError, Result};
use crate::repository::{LinkedIdentityRepository, UserRepository};
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Shown when the provider did not hand back a usable account
pub const LOGIN_FAILED: &str = "Login failed";
pub const EMAIL_REQUIRED: &str = "Email permission is required to sign in.";
pub const EMAIL_UNVERIFIED: &str =
    "An account with this email already exists. Verify your email with the provider to link it.";

pub struct OAuthService<U: UserRepository, L: LinkedIdentityRepository> {
    user_repo: Arc<U>,
    identity_repo: Arc<L>,
    config: OAuthConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    /// A boolean from the OIDC endpoint, a string from the legacy v3 one
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NaverUserInfo {
    resultcode: String,
    message: Option<String>,
    response: Option<NaverProfile>,
}

#[derive(Debug, Deserialize)]
struct NaverProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    nickname: Option<String>,
}

impl<U: UserRepository, L: LinkedIdentityRepository> OAuthService<U, L> {
    pub fn new(user_repo: Arc<U>, identity_repo: Arc<L>, config: OAuthConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            user_repo,
            identity_repo,
            config,
            http_client,
        }
    }

    fn provider_config(&self, provider: OAuthProvider) -> Result<&OAuthProviderConfig> {
        self.config.provider(provider).ok_or_else(|| {
            AppError::NotFound(format!("{} login is not configured", provider.display_name()))
        })
    }

    /// Provider consent page URL carrying `state`
    pub fn authorization_url(&self, provider: OAuthProvider, state: &str) -> Result<String> {
        let config = self.provider_config(provider)?;
        let mut auth_url =
            Url::parse(&config.authorize_url).map_err(|e| AppError::Internal(e.into()))?;

        {
            let mut pairs = auth_url.query_pairs_mut();
            pairs.append_pair("response_type", "code");
            pairs.append_pair("client_id", &config.client_id);
            pairs.append_pair("redirect_uri", &config.callback_url);
            if !config.scope.is_empty() {
                pairs.append_pair("scope", &config.scope);
            }
            pairs.append_pair("state", state);
        }

        Ok(auth_url.to_string())
    }

    /// Exchange `code`, fetch the profile and resolve it to a local user.
    ///
    /// `Unauthorized` means the provider returned no usable account; every
    /// other error is a provider or storage failure.
    pub async fn authenticate(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<User> {
        let result = async {
            let access_token = self.exchange_code(provider, code, state).await?;
            let profile = self.fetch_profile(provider, &access_token).await?;
            self.find_or_create_user(&profile).await
        }
        .await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        counter!("foodtip_auth_login_total", "provider" => provider.as_str(), "result" => outcome)
            .increment(1);
        result
    }

    async fn exchange_code(&self, provider: OAuthProvider, code: &str, state: &str) -> Result<String> {
        let config = self.provider_config(provider)?;
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.callback_url.as_str()),
            ("code", code),
            ("state", state),
        ];

        let response = self
            .http_client
            .post(&config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::OAuthProvider(format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::OAuthProvider(format!(
                "Failed to exchange code: {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::OAuthProvider(format!("Failed to parse token response: {}", e))
        })?;

        // Naver reports grant errors with a 200 status
        match token {
            TokenResponse {
                access_token: Some(access_token),
                ..
            } => Ok(access_token),
            TokenResponse {
                error: Some(error),
                error_description,
                ..
            } => Err(AppError::Unauthorized(
                error_description.unwrap_or(error),
            )),
            _ => Err(AppError::OAuthProvider(
                "Token response carried no access token".to_string(),
            )),
        }
    }

    async fn fetch_profile(
        &self,
        provider: OAuthProvider,
        access_token: &str,
    ) -> Result<ExternalProfile> {
        let config = self.provider_config(provider)?;
        debug!(provider = %provider, "Fetching userinfo");

        let response = self
            .http_client
            .get(&config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::OAuthProvider(format!("Failed to fetch userinfo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::OAuthProvider(format!(
                "Failed to fetch userinfo: {} - {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::OAuthProvider(format!("Failed to parse userinfo: {}", e)))?;

        parse_profile(provider, body)
    }

    /// Linked identity first, then an account with the same email, else a new user.
    ///
    /// An existing account is only linked by email when the provider verified it.
    pub async fn find_or_create_user(&self, profile: &ExternalProfile) -> Result<User> {
        if let Some(identity) = self
            .identity_repo
            .find_by_provider(profile.provider, &profile.external_user_id)
            .await?
        {
            if let Some(user) = self.user_repo.find_by_id(identity.user_id).await? {
                return Ok(user);
            }
        }

        let email = profile
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Unauthorized(EMAIL_REQUIRED.to_string()))?;

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) if profile.email_verified => user,
            Some(user) => {
                warn!(
                    user_id = %user.id,
                    provider = %profile.provider,
                    "Refusing to link account by unverified email"
                );
                return Err(AppError::Unauthorized(EMAIL_UNVERIFIED.to_string()));
            }
            None => {
                let name = profile
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
                let user = self
                    .user_repo
                    .create(&CreateUserInput {
                        email: email.clone(),
                        name,
                        password_hash: None,
                        provider: profile.provider.as_str().to_string(),
                    })
                    .await?;
                info!(user_id = %user.id, provider = %profile.provider, "User created from OAuth login");
                user
            }
        };

        self.identity_repo
            .create(&CreateLinkedIdentityInput {
                user_id: user.id,
                provider: profile.provider,
                external_user_id: profile.external_user_id.clone(),
                external_email: Some(email),
            })
            .await?;
        info!(user_id = %user.id, provider = %profile.provider, "External identity linked");

        Ok(user)
    }
}

fn parse_profile(provider: OAuthProvider, body: serde_json::Value) -> Result<ExternalProfile> {
    match provider {
        OAuthProvider::Google => {
            let info: GoogleUserInfo = serde_json::from_value(body).map_err(|e| {
                AppError::OAuthProvider(format!("Unexpected Google userinfo: {}", e))
            })?;
            let email_verified = match &info.email_verified {
                Some(serde_json::Value::Bool(verified)) => *verified,
                Some(serde_json::Value::String(verified)) => verified == "true",
                _ => false,
            };
            Ok(ExternalProfile {
                provider,
                external_user_id: info.sub,
                email: info.email,
                email_verified,
                name: info.name,
            })
        }
        OAuthProvider::Naver => {
            let info: NaverUserInfo = serde_json::from_value(body).map_err(|e| {
                AppError::OAuthProvider(format!("Unexpected Naver userinfo: {}", e))
            })?;
            let profile = match info.response {
                Some(profile) if info.resultcode == "00" => profile,
                _ => {
                    return Err(AppError::Unauthorized(
                        info.message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                    ))
                }
            };
            // Naver has no verification flag; the address is the one confirmed on the Naver account
            Ok(ExternalProfile {
                provider,
                external_user_id: profile.id,
                email: profile.email,
                email_verified: true,
                name: profile.name.or(profile.nickname),
            })
        }
    }
}
