//! API token repository for database operations.
//!
//! Tokens are stored as SHA-256 hashes; the plaintext is shown to the caller
//! once at issue time and never persisted.

use chrono::{DateTime, Utc};
use domain::models::ApiToken;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ApiTokenEntity;

/// Repository for API token database operations.
#[derive(Clone)]
pub struct ApiTokenRepository {
    pool: PgPool,
}

impl ApiTokenRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a newly issued token.
    pub async fn insert(
        &self,
        company_id: Uuid,
        name: &str,
        token_prefix: &str,
        token_hash: &str,
        is_admin: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiToken, sqlx::Error> {
        let entity = sqlx::query_as::<_, ApiTokenEntity>(
            r#"
            INSERT INTO api_tokens (company_id, name, token_prefix, token_hash, is_admin, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, company_id, name, token_prefix, token_hash, is_admin, is_active,
                      expires_at, last_used_at, created_at
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(token_prefix)
        .bind(token_hash)
        .bind(is_admin)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Look up an active, unexpired token by its hash.
    pub async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<ApiToken>, sqlx::Error> {
        let entity = sqlx::query_as::<_, ApiTokenEntity>(
            r#"
            SELECT id, company_id, name, token_prefix, token_hash, is_admin, is_active,
                   expires_at, last_used_at, created_at
            FROM api_tokens
            WHERE token_hash = $1
              AND is_active = TRUE
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// List tokens for a company, newest first.
    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<ApiToken>, sqlx::Error> {
        let entities = sqlx::query_as::<_, ApiTokenEntity>(
            r#"
            SELECT id, company_id, name, token_prefix, token_hash, is_admin, is_active,
                   expires_at, last_used_at, created_at
            FROM api_tokens
            WHERE company_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Deactivate a token. Returns false when no matching token exists.
    pub async fn revoke(&self, id: i64, company_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE api_tokens
            SET is_active = FALSE
            WHERE id = $1 AND company_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Update last_used_at asynchronously (fire and forget).
    ///
    /// Called from the hot auth path; a failure here must not fail the request.
    pub fn touch_last_used(&self, id: i64) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = sqlx::query("UPDATE api_tokens SET last_used_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&pool)
                .await;

            if let Err(e) = result {
                tracing::warn!(token_id = id, error = %e, "failed to update token last_used_at");
            }
        });
    }
}
