//! PostgreSQL-backed token store

use async_trait::async_trait;
use sqlx::PgPool;

use super::{MarkUsedOutcome, StoreError, TokenStore};
use crate::models::{NewRefreshRecord, RefreshRecord};

/// Token store over the `refresh_tokens` table
#[derive(Clone)]
pub struct PgTokenStore {
    db_pool: PgPool,
}

impl PgTokenStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Round-trip to the database, for health reporting
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn save(&self, record: NewRefreshRecord) -> Result<RefreshRecord, StoreError> {
        let saved: RefreshRecord = sqlx::query_as(
            r#"
            INSERT INTO refresh_tokens (user_id, access_jti, refresh_token_hash, client_ip, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, access_jti, refresh_token_hash, client_ip, created_at, expires_at, used
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.access_token_id)
        .bind(&record.refresh_token_hash)
        .bind(&record.client_ip)
        .bind(record.expires_at)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %record.user_id, "Failed to save refresh token");
            StoreError::from(e)
        })?;

        Ok(saved)
    }

    async fn find_by_access_token_id(
        &self,
        access_token_id: &str,
    ) -> Result<Option<RefreshRecord>, StoreError> {
        let record: Option<RefreshRecord> = sqlx::query_as(
            r#"
            SELECT id, user_id, access_jti, refresh_token_hash, client_ip, created_at, expires_at, used
            FROM refresh_tokens
            WHERE access_jti = $1
            "#,
        )
        .bind(access_token_id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find refresh token");
            StoreError::from(e)
        })?;

        Ok(record)
    }

    async fn mark_used(&self, id: i64) -> Result<MarkUsedOutcome, StoreError> {
        // Conditional update: only one concurrent caller can observe a row change
        let rows_affected = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET used = TRUE
            WHERE id = $1 AND used = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.db_pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, record_id = id, "Failed to mark refresh token as used");
            StoreError::from(e)
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Ok(MarkUsedOutcome::AlreadyUsed);
        }

        Ok(MarkUsedOutcome::Marked)
    }
}
