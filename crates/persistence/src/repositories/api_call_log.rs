//! API call log repository for database operations.

use domain::models::{ApiCallLog, ListLogsQuery, RecordApiCallInput};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ApiCallLogEntity;

/// Repository for API call log database operations.
#[derive(Clone)]
pub struct ApiCallLogRepository {
    pool: PgPool,
}

impl ApiCallLogRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a call log entry.
    pub async fn insert(&self, input: &RecordApiCallInput) -> Result<ApiCallLog, sqlx::Error> {
        let entity = sqlx::query_as::<_, ApiCallLogEntity>(
            r#"
            INSERT INTO api_call_logs (
                company_id, token_id, endpoint, response_time_ms,
                record_count, cache_hit, error
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, company_id, token_id, endpoint, response_time_ms,
                      record_count, cache_hit, error, created_at
            "#,
        )
        .bind(input.company_id)
        .bind(input.token_id)
        .bind(&input.endpoint)
        .bind(input.response_time_ms)
        .bind(input.record_count)
        .bind(input.cache_hit)
        .bind(&input.error)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Insert a call log entry asynchronously (fire and forget).
    ///
    /// Logging must never fail the request being logged.
    pub fn insert_async(&self, input: RecordApiCallInput) {
        let repo = self.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.insert(&input).await {
                tracing::warn!(
                    company_id = %input.company_id,
                    endpoint = %input.endpoint,
                    error = %e,
                    "failed to record API call log"
                );
            }
        });
    }

    /// List call logs for a company, newest first, with a total count.
    pub async fn list(
        &self,
        company_id: Uuid,
        query: &ListLogsQuery,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<ApiCallLog>, i64), sqlx::Error> {
        let offset = (page - 1) * per_page;

        let entities = sqlx::query_as::<_, ApiCallLogEntity>(
            r#"
            SELECT id, company_id, token_id, endpoint, response_time_ms,
                   record_count, cache_hit, error, created_at
            FROM api_call_logs
            WHERE company_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(company_id)
        .bind(query.from)
        .bind(query.to)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM api_call_logs
            WHERE company_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            "#,
        )
        .bind(company_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_one(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Remove entries older than the retention window. Returns rows removed.
    pub async fn delete_older_than_days(&self, days: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM api_call_logs WHERE created_at < NOW() - $1 * INTERVAL '1 day'",
        )
        .bind(days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
