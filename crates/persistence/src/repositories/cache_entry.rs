//! Response cache repository for database operations.
//!
//! Cached report responses keyed by a SHA-256 digest over company id,
//! endpoint, and canonical query parameters.

use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CacheEntryEntity;

/// Repository for response cache database operations.
#[derive(Clone)]
pub struct CacheRepository {
    pool: PgPool,
}

impl CacheRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up an unexpired entry, bumping its hit counter on a hit.
    pub async fn find_valid(
        &self,
        cache_key: &str,
    ) -> Result<Option<CacheEntryEntity>, sqlx::Error> {
        sqlx::query_as::<_, CacheEntryEntity>(
            r#"
            UPDATE cache_entries
            SET hit_count = hit_count + 1
            WHERE cache_key = $1 AND expires_at > NOW()
            RETURNING id, cache_key, company_id, payload, created_at, expires_at, hit_count
            "#,
        )
        .bind(cache_key)
        .fetch_optional(&self.pool)
        .await
    }

    /// Store a response payload under a key with the given TTL.
    ///
    /// An existing entry for the key is replaced and its hit counter reset.
    pub async fn store(
        &self,
        cache_key: &str,
        company_id: Uuid,
        payload: &serde_json::Value,
        ttl: Duration,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO cache_entries (cache_key, company_id, payload, expires_at)
            VALUES ($1, $2, $3, NOW() + make_interval(secs => $4::double precision))
            ON CONFLICT (cache_key)
            DO UPDATE SET
                payload = EXCLUDED.payload,
                created_at = NOW(),
                expires_at = EXCLUDED.expires_at,
                hit_count = 0
            "#,
        )
        .bind(cache_key)
        .bind(company_id)
        .bind(payload)
        .bind(ttl.num_seconds())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop all cached responses for a company. Returns the number removed.
    pub async fn clear_company(&self, company_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE company_id = $1")
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove expired entries. Returns the number removed.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
