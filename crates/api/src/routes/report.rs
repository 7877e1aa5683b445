//! Completion report API routes.
//!
//! Company-scoped: the authenticated token determines which company's
//! reporting rows are served. Every request is recorded in the API call log.

use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::{CompletionStatus, ExportFormat, RecordApiCallInput, ReportQuery};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_token::TokenAuth;
use crate::services::ReportService;
use persistence::repositories::ApiCallLogRepository;

/// Query parameters for the export endpoint.
///
/// Mirrors the completions filters; pagination is handled internally so
/// cursor and limit are not accepted here.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    pub user_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<CompletionStatus>,
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl ExportQuery {
    fn report_query(&self) -> ReportQuery {
        ReportQuery {
            user_id: self.user_id,
            course_id: self.course_id,
            status: self.status,
            since: self.since,
            include_deleted: self.include_deleted,
            cursor: None,
            limit: None,
        }
    }
}

/// GET /api/v1/report/completions
///
/// One page of completion rows for the token's company, filtered and
/// field-limited per company settings.
pub async fn completions(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let service = ReportService::new(state.pool.clone(), state.config.cache.default_ttl_seconds);
    let logs = ApiCallLogRepository::new(state.pool.clone());

    let start = std::time::Instant::now();
    let result = service.completions(auth.company_id, &query).await;
    let elapsed_ms = start.elapsed().as_millis() as i64;

    match result {
        Ok(output) => {
            logs.insert_async(RecordApiCallInput {
                company_id: auth.company_id,
                token_id: Some(auth.token_id),
                endpoint: "report/completions".to_string(),
                response_time_ms: elapsed_ms,
                record_count: output.record_count,
                cache_hit: output.cache_hit,
                error: None,
            });
            Ok(Json(output.body).into_response())
        }
        Err(err) => {
            logs.insert_async(RecordApiCallInput {
                company_id: auth.company_id,
                token_id: Some(auth.token_id),
                endpoint: "report/completions".to_string(),
                response_time_ms: elapsed_ms,
                record_count: 0,
                cache_hit: false,
                error: Some(err.to_string()),
            });
            Err(err)
        }
    }
}

/// GET /api/v1/report/completions/export
///
/// The whole filtered dataset as a CSV or JSON attachment.
pub async fn export(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let service = ReportService::new(state.pool.clone(), state.config.cache.default_ttl_seconds);
    let logs = ApiCallLogRepository::new(state.pool.clone());
    let format = query.format;

    let start = std::time::Instant::now();
    let result = service
        .export(auth.company_id, &query.report_query(), format)
        .await;
    let elapsed_ms = start.elapsed().as_millis() as i64;

    match result {
        Ok((body, record_count)) => {
            logs.insert_async(RecordApiCallInput {
                company_id: auth.company_id,
                token_id: Some(auth.token_id),
                endpoint: "report/completions/export".to_string(),
                response_time_ms: elapsed_ms,
                record_count,
                cache_hit: false,
                error: None,
            });

            let filename = format!("completions_{}.{}", auth.company_id, format.extension());
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                body,
            )
                .into_response())
        }
        Err(err) => {
            logs.insert_async(RecordApiCallInput {
                company_id: auth.company_id,
                token_id: Some(auth.token_id),
                endpoint: "report/completions/export".to_string(),
                response_time_ms: elapsed_ms,
                record_count: 0,
                cache_hit: false,
                error: Some(err.to_string()),
            });
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_query_defaults() {
        let query: ExportQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.format, ExportFormat::Json);
        assert!(!query.include_deleted);
    }

    #[test]
    fn test_export_query_to_report_query() {
        let query = ExportQuery {
            format: ExportFormat::Csv,
            user_id: Some(5),
            course_id: None,
            status: Some(CompletionStatus::Completed),
            since: None,
            include_deleted: true,
        };
        let report = query.report_query();
        assert_eq!(report.user_id, Some(5));
        assert_eq!(report.status, Some(CompletionStatus::Completed));
        assert!(report.include_deleted);
        assert!(report.cursor.is_none());
        assert!(report.limit.is_none());
    }
}
