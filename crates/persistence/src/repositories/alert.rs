//! Alert repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{Alert, ListAlertsQuery, RaiseAlertInput};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AlertEntity;

/// Repository for alert database operations.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new alert.
    pub async fn insert(&self, input: &RaiseAlertInput) -> Result<Alert, sqlx::Error> {
        let entity = sqlx::query_as::<_, AlertEntity>(
            r#"
            INSERT INTO alerts (company_id, alert_type, severity, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, alert_type, severity, message,
                      resolved, resolved_at, created_at
            "#,
        )
        .bind(input.company_id)
        .bind(&input.alert_type)
        .bind(input.severity.to_string())
        .bind(&input.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Timestamp of the newest unresolved alert of a type for a company.
    ///
    /// Drives the cooldown check: a fresh unresolved alert suppresses
    /// duplicates of the same type.
    pub async fn latest_unresolved_at(
        &self,
        company_id: Option<Uuid>,
        alert_type: &str,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT MAX(created_at)
            FROM alerts
            WHERE company_id IS NOT DISTINCT FROM $1
              AND alert_type = $2
              AND resolved = FALSE
            "#,
        )
        .bind(company_id)
        .bind(alert_type)
        .fetch_one(&self.pool)
        .await
    }

    /// List alerts with optional filters, newest first, with a total count.
    pub async fn list(
        &self,
        query: &ListAlertsQuery,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Alert>, i64), sqlx::Error> {
        let offset = (page - 1) * per_page;
        let severity = query.severity.map(|s| s.to_string());

        let entities = sqlx::query_as::<_, AlertEntity>(
            r#"
            SELECT id, company_id, alert_type, severity, message,
                   resolved, resolved_at, created_at
            FROM alerts
            WHERE ($1::boolean IS NULL OR resolved = $1)
              AND ($2::varchar IS NULL OR severity = $2)
              AND ($3::uuid IS NULL OR company_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.resolved)
        .bind(&severity)
        .bind(query.company_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM alerts
            WHERE ($1::boolean IS NULL OR resolved = $1)
              AND ($2::varchar IS NULL OR severity = $2)
              AND ($3::uuid IS NULL OR company_id = $3)
            "#,
        )
        .bind(query.resolved)
        .bind(&severity)
        .bind(query.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Mark an alert resolved. Returns the updated alert.
    pub async fn resolve(&self, id: i64) -> Result<Alert, sqlx::Error> {
        let entity = sqlx::query_as::<_, AlertEntity>(
            r#"
            UPDATE alerts
            SET resolved = TRUE, resolved_at = NOW()
            WHERE id = $1
            RETURNING id, company_id, alert_type, severity, message,
                      resolved, resolved_at, created_at
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Remove resolved alerts older than the retention window.
    pub async fn delete_resolved_older_than_days(&self, days: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM alerts
            WHERE resolved = TRUE
              AND resolved_at < NOW() - $1 * INTERVAL '1 day'
            "#,
        )
        .bind(days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
