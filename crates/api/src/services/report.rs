//! Report query service: cache lookup, pagination, field visibility.

use chrono::{Duration, Utc};
use domain::models::{build_cache_key, ExportFormat, ReportPage, ReportQuery, REPORT_FIELDS};
use domain::services::render_csv;
use persistence::repositories::{CacheRepository, ReportingRecordRepository};
use shared::pagination::{decode_cursor, encode_cursor};
use sqlx::PgPool;
use uuid::Uuid;

use super::settings::SettingsService;
use crate::error::ApiError;
use crate::middleware::metrics;

/// Default and maximum page sizes for the completions endpoint.
pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Cache endpoint tag for the completions listing.
const COMPLETIONS_ENDPOINT: &str = "report/completions";

/// Page size used internally when exporting the whole dataset.
const EXPORT_CHUNK_SIZE: i64 = 1000;

/// Result of serving a report request.
#[derive(Debug)]
pub struct ReportOutput {
    /// The response body (a serialized [`ReportPage`]).
    pub body: serde_json::Value,
    pub record_count: i64,
    pub cache_hit: bool,
}

/// Serves report queries from the denormalized reporting table, with an
/// optional whole-response cache for uncursored requests.
#[derive(Clone)]
pub struct ReportService {
    records: ReportingRecordRepository,
    cache: CacheRepository,
    settings: SettingsService,
    default_cache_ttl_seconds: i64,
}

impl ReportService {
    pub fn new(pool: PgPool, default_cache_ttl_seconds: i64) -> Self {
        Self {
            records: ReportingRecordRepository::new(pool.clone()),
            cache: CacheRepository::new(pool.clone()),
            settings: SettingsService::new(pool),
            default_cache_ttl_seconds,
        }
    }

    /// Serve one page of completions, consulting the response cache for
    /// cacheable request shapes.
    pub async fn completions(
        &self,
        company_id: Uuid,
        query: &ReportQuery,
    ) -> Result<ReportOutput, ApiError> {
        let cache_key = if query.is_cacheable() {
            Some(build_cache_key(
                company_id,
                COMPLETIONS_ENDPOINT,
                &query.cache_params(),
            ))
        } else {
            None
        };

        if let Some(ref key) = cache_key {
            if let Some(entry) = self.cache.find_valid(key).await? {
                metrics::record_cache_lookup(true);
                let record_count = entry
                    .payload
                    .get("record_count")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0);
                return Ok(ReportOutput {
                    body: entry.payload,
                    record_count,
                    cache_hit: true,
                });
            }
            metrics::record_cache_lookup(false);
        }

        let settings = self.settings.effective(company_id).await?;

        let cursor = match query.cursor.as_deref() {
            Some(raw) => Some(decode_cursor(raw)?),
            None => None,
        };
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let mut rows = self
            .records
            .query_report(company_id, query, cursor, limit)
            .await?;

        // query_report fetches limit + 1 rows; the extra row signals that
        // another page exists.
        let next_cursor = if rows.len() as i64 > limit {
            rows.truncate(limit as usize);
            rows.last().map(|r| encode_cursor(r.last_updated, r.id))
        } else {
            None
        };

        let records: Vec<serde_json::Value> =
            rows.iter().map(|r| r.to_visible_json(&settings)).collect();
        let record_count = records.len();

        let page = ReportPage {
            company_id,
            records,
            record_count,
            next_cursor,
            generated_at: Utc::now(),
        };

        let body = serde_json::to_value(&page)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize report: {}", e)))?;

        if let Some(key) = cache_key {
            let ttl = settings
                .cache_ttl_seconds
                .unwrap_or(self.default_cache_ttl_seconds);
            self.cache
                .store(&key, company_id, &body, Duration::seconds(ttl))
                .await?;
        }

        Ok(ReportOutput {
            body,
            record_count: record_count as i64,
            cache_hit: false,
        })
    }

    /// Render the whole filtered dataset for download.
    ///
    /// Pages through the reporting table internally; the response cache is
    /// bypassed.
    pub async fn export(
        &self,
        company_id: Uuid,
        query: &ReportQuery,
        format: ExportFormat,
    ) -> Result<(String, i64), ApiError> {
        let settings = self.settings.effective(company_id).await?;

        let mut all_rows = Vec::new();
        let mut cursor = None;
        loop {
            let mut rows = self
                .records
                .query_report(company_id, query, cursor, EXPORT_CHUNK_SIZE)
                .await?;

            let more = rows.len() as i64 > EXPORT_CHUNK_SIZE;
            if more {
                rows.truncate(EXPORT_CHUNK_SIZE as usize);
            }
            cursor = rows.last().map(|r| (r.last_updated, r.id));

            all_rows.extend(rows.iter().map(|r| r.to_visible_json(&settings)));

            if !more {
                break;
            }
        }

        let record_count = all_rows.len() as i64;
        let body = match format {
            ExportFormat::Json => serde_json::to_string(&all_rows)
                .map_err(|e| ApiError::Internal(format!("Failed to serialize export: {}", e)))?,
            ExportFormat::Csv => {
                let columns = export_columns(&settings);
                render_csv(&columns, &all_rows)
            }
        };

        Ok((body, record_count))
    }
}

/// CSV column order: row identity first, then visible report fields.
fn export_columns(settings: &domain::models::ReportSettings) -> Vec<String> {
    let mut columns = vec![
        "id".to_string(),
        "user_id".to_string(),
        "course_id".to_string(),
    ];
    columns.extend(
        REPORT_FIELDS
            .iter()
            .filter(|f| settings.is_visible(f))
            .map(|f| f.to_string()),
    );
    columns.push("is_deleted".to_string());
    columns.push("last_updated".to_string());
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ReportSettings;

    #[test]
    fn test_export_columns_all_visible() {
        let columns = export_columns(&ReportSettings::default());
        assert_eq!(columns[0], "id");
        assert!(columns.contains(&"email".to_string()));
        assert_eq!(columns.last().unwrap(), "last_updated");
        // identity (3) + all report fields + deletion marker + timestamp
        assert_eq!(columns.len(), 3 + REPORT_FIELDS.len() + 2);
    }

    #[test]
    fn test_export_columns_hidden_field_dropped() {
        let mut settings = ReportSettings::default();
        settings.visible_fields.remove("email");
        let columns = export_columns(&settings);
        assert!(!columns.contains(&"email".to_string()));
        assert!(columns.contains(&"username".to_string()));
    }
}
