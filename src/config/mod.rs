//! Configuration management for FoodTip Core

use crate::domain::OAuthProvider;
use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
    /// Base URL of the browser client; OAuth callbacks redirect here
    pub client_url: String,
    /// Allowed CORS origins. Empty means only `client_url`.
    pub cors_allowed_origins: Vec<String>,
    /// OAuth provider configuration
    pub oauth: OAuthConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key used to HMAC session tokens before they are stored
    pub secret: String,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Session lifetime in seconds
    pub ttl_secs: i64,
    /// Mark cookies `Secure`
    pub secure_cookies: bool,
}

/// Client credentials and endpoints for one OAuth provider
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Our callback URL registered with the provider
    pub callback_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scope: String,
}

#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
    pub google: Option<OAuthProviderConfig>,
    pub naver: Option<OAuthProviderConfig>,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Expose Prometheus metrics on `/metrics`
    pub metrics_enabled: bool,
    /// "json" or "pretty"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            log_format: "pretty".to_string(),
            service_name: "foodtip-core".to_string(),
        }
    }
}

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const NAVER_AUTHORIZE_URL: &str = "https://nid.naver.com/oauth2.0/authorize";
const NAVER_TOKEN_URL: &str = "https://nid.naver.com/oauth2.0/token";
const NAVER_USERINFO_URL: &str = "https://openapi.naver.com/v1/nid/me";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            session: SessionConfig {
                secret: env::var("SESSION_SECRET").context("SESSION_SECRET is required")?,
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|_| "connect.sid".to_string()),
                ttl_secs: env::var("SESSION_TTL_SECS")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()
                    .unwrap_or(86400),
                secure_cookies: env::var("SESSION_SECURE_COOKIES")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(is_production),
            },
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            oauth: OAuthConfig {
                google: provider_from_env(
                    "GOOGLE",
                    GOOGLE_AUTHORIZE_URL,
                    GOOGLE_TOKEN_URL,
                    GOOGLE_USERINFO_URL,
                    "openid email profile",
                ),
                naver: provider_from_env(
                    "NAVER",
                    NAVER_AUTHORIZE_URL,
                    NAVER_TOKEN_URL,
                    NAVER_USERINFO_URL,
                    "",
                ),
            },
            telemetry: TelemetryConfig {
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "foodtip-core".to_string()),
            },
            environment,
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl OAuthConfig {
    pub fn provider(&self, provider: OAuthProvider) -> Option<&OAuthProviderConfig> {
        match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::Naver => self.naver.as_ref(),
        }
    }
}

/// Reads `{PREFIX}_CLIENT_ID`, `{PREFIX}_CLIENT_SECRET` and `{PREFIX}_CALLBACK_URL`.
/// The provider is disabled unless both credentials are present.
fn provider_from_env(
    prefix: &str,
    authorize_url: &str,
    token_url: &str,
    userinfo_url: &str,
    scope: &str,
) -> Option<OAuthProviderConfig> {
    let client_id = env::var(format!("{prefix}_CLIENT_ID")).ok()?;
    let client_secret = env::var(format!("{prefix}_CLIENT_SECRET")).ok()?;
    let lower = prefix.to_lowercase();
    let callback_url = env::var(format!("{prefix}_CALLBACK_URL"))
        .unwrap_or_else(|_| format!("http://localhost:8080/api/auth/{lower}/callback"));

    Some(OAuthProviderConfig {
        client_id,
        client_secret,
        callback_url,
        authorize_url: authorize_url.to_string(),
        token_url: token_url.to_string(),
        userinfo_url: userinfo_url.to_string(),
        scope: scope.to_string(),
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
