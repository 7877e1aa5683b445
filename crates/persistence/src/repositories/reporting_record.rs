//! Reporting record repository for database operations.
//!
//! The reporting_records table is the denormalized projection the report API
//! reads from. The sync engine fills it from the live lms_* tables; report
//! queries never touch the live tables directly.

use chrono::{DateTime, Utc};
use domain::models::{CompletionRecord, ReportQuery};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{LiveCompletionRow, ReportingRecordEntity};

/// Helper struct for building dynamic WHERE clauses from report filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct ReportFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl ReportFilterBuilder {
    /// Build filter conditions from a query.
    fn build(query: &ReportQuery, has_cursor: bool) -> Self {
        let mut conditions = vec!["company_id = $1".to_string()];
        let mut param_count = 1;

        if !query.include_deleted {
            conditions.push("is_deleted = FALSE".to_string());
        }

        if query.user_id.is_some() {
            param_count += 1;
            conditions.push(format!("user_id = ${}", param_count));
        }

        if query.course_id.is_some() {
            param_count += 1;
            conditions.push(format!("course_id = ${}", param_count));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if query.since.is_some() {
            param_count += 1;
            conditions.push(format!("last_updated >= ${}", param_count));
        }

        if has_cursor {
            let ts = param_count + 1;
            let id = param_count + 2;
            param_count += 2;
            conditions.push(format!(
                "(last_updated > ${ts} OR (last_updated = ${ts} AND id > ${id}))"
            ));
        }

        Self { conditions, param_count }
    }

    fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind report filter parameters to a SQLx builder.
/// This avoids code duplication for binding optional query parameters.
macro_rules! bind_report_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(user_id) = $query.user_id {
            b = b.bind(user_id);
        }
        if let Some(course_id) = $query.course_id {
            b = b.bind(course_id);
        }
        if let Some(status) = $query.status {
            b = b.bind(status.to_string());
        }
        if let Some(since) = $query.since {
            b = b.bind(since);
        }
        b
    }};
}

/// Joined projection of the live tables consumed by the sync engine.
/// Restricted to active enrolments of non-deleted users; everything else
/// is the orphan sweep's business.
const LIVE_ROWS_SQL: &str = r#"
    SELECT u.id AS user_id,
           c.id AS course_id,
           u.username,
           u.email,
           u.first_name,
           u.last_name,
           u.department,
           c.fullname AS course_fullname,
           c.shortname AS course_shortname,
           cc.id AS completion_id,
           cc.time_enrolled,
           cc.time_started,
           cc.time_completed,
           cc.final_grade
    FROM lms_enrolments e
    JOIN lms_users u ON u.id = e.user_id
    JOIN lms_courses c ON c.id = e.course_id
    LEFT JOIN lms_course_completions cc
           ON cc.user_id = e.user_id AND cc.course_id = e.course_id
    WHERE u.company_id = $1
      AND u.deleted = FALSE
      AND e.status = 'active'
      AND ($2::timestamptz IS NULL OR GREATEST(
               e.time_modified,
               u.time_modified,
               c.time_modified,
               COALESCE(cc.time_modified, e.time_modified)
           ) >= $2)
    ORDER BY u.id, c.id
    LIMIT $3 OFFSET $4
"#;

/// Flags reporting rows whose backing enrolment is gone, no longer active,
/// or belongs to a deleted user.
const SOFT_DELETE_ORPHANS_SQL: &str = r#"
    UPDATE reporting_records r
    SET is_deleted = TRUE, last_updated = NOW()
    WHERE r.company_id = $1
      AND r.is_deleted = FALSE
      AND NOT EXISTS (
          SELECT 1
          FROM lms_enrolments e
          JOIN lms_users u ON u.id = e.user_id
          WHERE e.user_id = r.user_id
            AND e.course_id = r.course_id
            AND e.status = 'active'
            AND u.company_id = r.company_id
            AND u.deleted = FALSE
      )
"#;

/// Repository for reporting record database operations.
#[derive(Clone)]
pub struct ReportingRecordRepository {
    pool: PgPool,
}

impl ReportingRecordRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a batch of joined live rows for a company.
    ///
    /// Only active enrolments are projected; suspended or withdrawn
    /// enrolments are left to `soft_delete_orphans`. `since` restricts to
    /// enrolments whose user, course, enrolment, or completion row changed
    /// at or after the cutoff (incremental sync). Rows are keyed by
    /// (user_id, course_id), so offset paging over the stable ordering is
    /// safe within one sync run.
    pub async fn fetch_live_rows(
        &self,
        company_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LiveCompletionRow>, sqlx::Error> {
        sqlx::query_as::<_, LiveCompletionRow>(LIVE_ROWS_SQL)
            .bind(company_id)
            .bind(since)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Upsert a batch of live rows into reporting_records.
    ///
    /// Re-synced rows that were previously soft-deleted are revived. All rows
    /// in the batch commit atomically. Returns the number of rows written.
    pub async fn upsert_many(
        &self,
        company_id: Uuid,
        rows: &[LiveCompletionRow],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for row in rows {
            let result = sqlx::query(
                r#"
                INSERT INTO reporting_records (
                    company_id, user_id, course_id, username, email,
                    first_name, last_name, department, course_fullname,
                    course_shortname, status, time_enrolled, time_started,
                    time_completed, final_grade
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT (company_id, user_id, course_id)
                DO UPDATE SET
                    username = EXCLUDED.username,
                    email = EXCLUDED.email,
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name,
                    department = EXCLUDED.department,
                    course_fullname = EXCLUDED.course_fullname,
                    course_shortname = EXCLUDED.course_shortname,
                    status = EXCLUDED.status,
                    time_enrolled = EXCLUDED.time_enrolled,
                    time_started = EXCLUDED.time_started,
                    time_completed = EXCLUDED.time_completed,
                    final_grade = EXCLUDED.final_grade,
                    is_deleted = FALSE,
                    last_updated = NOW()
                "#,
            )
            .bind(company_id)
            .bind(row.user_id)
            .bind(row.course_id)
            .bind(&row.username)
            .bind(&row.email)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(&row.department)
            .bind(&row.course_fullname)
            .bind(&row.course_shortname)
            .bind(row.status().to_string())
            .bind(row.time_enrolled)
            .bind(row.time_started)
            .bind(row.time_completed)
            .bind(row.final_grade)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Soft-delete records whose live enrolment no longer exists or is no
    /// longer active.
    ///
    /// Rows are flagged, never removed, so historical report data survives
    /// unenrolment or suspension. Returns the number of rows flagged.
    pub async fn soft_delete_orphans(&self, company_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(SOFT_DELETE_ORPHANS_SQL)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Query reporting records with filters and cursor pagination.
    ///
    /// Ordering is (last_updated, id) ascending, so the cursor is stable
    /// across pages even while sync runs. Fetches `limit + 1` rows; the
    /// caller pops the extra row to detect whether another page exists.
    pub async fn query_report(
        &self,
        company_id: Uuid,
        query: &ReportQuery,
        cursor: Option<(DateTime<Utc>, i64)>,
        limit: i64,
    ) -> Result<Vec<CompletionRecord>, sqlx::Error> {
        let filter = ReportFilterBuilder::build(query, cursor.is_some());
        let limit_param = filter.param_count() + 1;

        let sql = format!(
            r#"
            SELECT id, company_id, user_id, course_id, username, email,
                   first_name, last_name, department, course_fullname,
                   course_shortname, status, time_enrolled, time_started,
                   time_completed, final_grade, time_created, last_updated,
                   is_deleted
            FROM reporting_records
            WHERE {}
            ORDER BY last_updated, id
            LIMIT ${}
            "#,
            filter.where_clause(),
            limit_param
        );

        let mut builder = sqlx::query_as::<_, ReportingRecordEntity>(&sql).bind(company_id);
        builder = bind_report_filters!(builder, query);
        if let Some((ts, id)) = cursor {
            builder = builder.bind(ts).bind(id);
        }

        let entities = builder
            .bind(limit + 1)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities
            .into_iter()
            .map(ReportingRecordEntity::into_domain)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> ReportQuery {
        ReportQuery {
            user_id: None,
            course_id: None,
            status: None,
            since: None,
            include_deleted: false,
            cursor: None,
            limit: None,
        }
    }

    #[test]
    fn test_filter_builder_defaults_exclude_deleted() {
        let filter = ReportFilterBuilder::build(&empty_query(), false);
        assert_eq!(filter.where_clause(), "company_id = $1 AND is_deleted = FALSE");
        assert_eq!(filter.param_count(), 1);
    }

    #[test]
    fn test_filter_builder_include_deleted_drops_flag() {
        let mut query = empty_query();
        query.include_deleted = true;
        let filter = ReportFilterBuilder::build(&query, false);
        assert_eq!(filter.where_clause(), "company_id = $1");
    }

    #[test]
    fn test_live_rows_project_only_active_enrolments() {
        assert!(LIVE_ROWS_SQL.contains("AND e.status = 'active'"));
        assert!(LIVE_ROWS_SQL.contains("AND u.deleted = FALSE"));
    }

    #[test]
    fn test_orphan_sweep_reclaims_inactive_enrolments() {
        // A row must stay live only while a matching enrolment is still
        // active; suspended or withdrawn enrolments get soft-deleted.
        assert!(SOFT_DELETE_ORPHANS_SQL.contains("AND e.status = 'active'"));
        assert!(SOFT_DELETE_ORPHANS_SQL.contains("NOT EXISTS"));
        assert!(SOFT_DELETE_ORPHANS_SQL.contains("SET is_deleted = TRUE"));
    }

    #[test]
    fn test_filter_builder_numbers_params_in_order() {
        let mut query = empty_query();
        query.user_id = Some(7);
        query.since = Some(Utc::now());
        let filter = ReportFilterBuilder::build(&query, true);
        assert!(filter.where_clause().contains("user_id = $2"));
        assert!(filter.where_clause().contains("last_updated >= $3"));
        assert!(filter.where_clause().contains("last_updated > $4"));
        assert!(filter.where_clause().contains("id > $5"));
        assert_eq!(filter.param_count(), 5);
    }
}
