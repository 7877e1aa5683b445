//! Sync state repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SyncStateEntity;

/// Repository for per-company sync cutoff tracking.
#[derive(Clone)]
pub struct SyncStateRepository {
    pool: PgPool,
}

impl SyncStateRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the sync state for a company, if any sync has run.
    pub async fn find(&self, company_id: Uuid) -> Result<Option<SyncStateEntity>, sqlx::Error> {
        sqlx::query_as::<_, SyncStateEntity>(
            r#"
            SELECT company_id, last_synced_at, last_full_sync_at, updated_at
            FROM sync_state
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record a completed sync run.
    ///
    /// The cutoff is captured at run start, not at completion, so rows that
    /// change mid-run are picked up again next time.
    pub async fn record_sync(
        &self,
        company_id: Uuid,
        synced_at: DateTime<Utc>,
        was_full: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sync_state (company_id, last_synced_at, last_full_sync_at)
            VALUES ($1, $2, CASE WHEN $3 THEN $2 ELSE NULL END)
            ON CONFLICT (company_id)
            DO UPDATE SET
                last_synced_at = EXCLUDED.last_synced_at,
                last_full_sync_at = CASE WHEN $3 THEN $2 ELSE sync_state.last_full_sync_at END,
                updated_at = NOW()
            "#,
        )
        .bind(company_id)
        .bind(synced_at)
        .bind(was_full)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
