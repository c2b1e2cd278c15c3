//! Session repository

use crate::domain::{CreateSessionInput, Session};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, input: &CreateSessionInput) -> Result<Session>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>>;
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<()>;
    /// Remove sessions past their expiry; returns the number removed
    async fn delete_expired(&self) -> Result<u64>;
}

pub struct SessionRepositoryImpl {
    pool: MySqlPool,
}

impl SessionRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SessionRepositoryImpl {
    async fn create(&self, input: &CreateSessionInput) -> Result<Session> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, NOW())
            "#,
        )
        .bind(id)
        .bind(input.user_id)
        .bind(&input.token_hash)
        .bind(input.expires_at)
        .execute(&self.pool)
        .await?;

        self.find_by_token_hash(&input.token_hash)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create session")))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = ?
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
