//! External OAuth identities linked to local users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Supported OAuth login providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Naver,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Naver => "naver",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Naver => "Naver",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linked identity entity (tracks external IdP accounts)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedIdentity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub external_user_id: String,
    pub external_email: Option<String>,
    pub linked_at: DateTime<Utc>,
}

impl Default for LinkedIdentity {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            provider: String::new(),
            external_user_id: String::new(),
            external_email: None,
            linked_at: Utc::now(),
        }
    }
}

/// Input for creating a linked identity
#[derive(Debug, Clone)]
pub struct CreateLinkedIdentityInput {
    pub user_id: Uuid,
    pub provider: OAuthProvider,
    pub external_user_id: String,
    pub external_email: Option<String>,
}

/// Profile returned by a provider's userinfo endpoint, normalized across providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub provider: OAuthProvider,
    pub external_user_id: String,
    pub email: Option<String>,
    /// Whether the provider vouches that `email` belongs to this account
    pub email_verified: bool,
    pub name: Option<String>,
}
