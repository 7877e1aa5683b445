//! Idempotency key repository for database operations.
//!
//! Replays of a mutating admin request with the same Idempotency-Key header
//! return the stored response instead of re-executing.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::IdempotencyKeyEntity;

/// Repository for idempotency key database operations.
#[derive(Clone)]
pub struct IdempotencyKeyRepository {
    pool: PgPool,
}

impl IdempotencyKeyRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a stored, unexpired response for a key hash.
    pub async fn find_valid(
        &self,
        key_hash: &str,
    ) -> Result<Option<IdempotencyKeyEntity>, sqlx::Error> {
        sqlx::query_as::<_, IdempotencyKeyEntity>(
            r#"
            SELECT id, key_hash, company_id, endpoint, response_status,
                   response_body, created_at, expires_at
            FROM idempotency_keys
            WHERE key_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
    }

    /// Reserve a key before the request runs.
    ///
    /// Inserts a placeholder row with `response_status = 0`. Returns `true`
    /// when this caller won the reservation; `false` means another request
    /// already holds the key (pending or completed).
    pub async fn insert_pending(
        &self,
        key_hash: &str,
        company_id: Uuid,
        endpoint: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO idempotency_keys (key_hash, company_id, endpoint, response_status, response_body)
            VALUES ($1, $2, $3, 0, '{}'::jsonb)
            ON CONFLICT (key_hash) DO NOTHING
            "#,
        )
        .bind(key_hash)
        .bind(company_id)
        .bind(endpoint)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fill a reserved key with the response the request produced.
    pub async fn complete(
        &self,
        key_hash: &str,
        response_status: i16,
        response_body: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE idempotency_keys
            SET response_status = $2, response_body = $3
            WHERE key_hash = $1
            "#,
        )
        .bind(key_hash)
        .bind(response_status)
        .bind(response_body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Release a reserved key whose request failed, so a retry can run.
    pub async fn release(&self, key_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM idempotency_keys WHERE key_hash = $1 AND response_status = 0")
            .bind(key_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove expired keys. Returns the number removed.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM idempotency_keys WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove keys older than the given number of hours regardless of their
    /// expiry. Returns the number removed.
    pub async fn delete_older_than_hours(&self, hours: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM idempotency_keys
            WHERE created_at < NOW() - make_interval(hours => $1::int)
            "#,
        )
        .bind(hours)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
