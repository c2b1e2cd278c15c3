//! Linked identity repository

use crate::domain::{CreateLinkedIdentityInput, LinkedIdentity, OAuthProvider};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkedIdentityRepository: Send + Sync {
    async fn create(&self, input: &CreateLinkedIdentityInput) -> Result<LinkedIdentity>;
    async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        external_user_id: &str,
    ) -> Result<Option<LinkedIdentity>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LinkedIdentity>>;
}

pub struct LinkedIdentityRepositoryImpl {
    pool: MySqlPool,
}

impl LinkedIdentityRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkedIdentityRepository for LinkedIdentityRepositoryImpl {
    async fn create(&self, input: &CreateLinkedIdentityInput) -> Result<LinkedIdentity> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO linked_identities (id, user_id, provider, external_user_id,
                                           external_email, linked_at)
            VALUES (?, ?, ?, ?, ?, NOW())
            "#,
        )
        .bind(id)
        .bind(input.user_id)
        .bind(input.provider.as_str())
        .bind(&input.external_user_id)
        .bind(&input.external_email)
        .execute(&self.pool)
        .await?;

        self.find_by_provider(input.provider, &input.external_user_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create linked identity")))
    }

    async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        external_user_id: &str,
    ) -> Result<Option<LinkedIdentity>> {
        let identity = sqlx::query_as::<_, LinkedIdentity>(
            r#"
            SELECT id, user_id, provider, external_user_id, external_email, linked_at
            FROM linked_identities
            WHERE provider = ? AND external_user_id = ?
            "#,
        )
        .bind(provider.as_str())
        .bind(external_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LinkedIdentity>> {
        let identities = sqlx::query_as::<_, LinkedIdentity>(
            r#"
            SELECT id, user_id, provider, external_user_id, external_email, linked_at
            FROM linked_identities
            WHERE user_id = ?
            ORDER BY linked_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(identities)
    }
}
