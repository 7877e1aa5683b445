//! API call audit-log domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only audit row recorded for every report API call.
#[derive(Debug, Clone, Serialize)]
pub struct ApiCallLog {
    pub id: i64,
    pub company_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<i64>,
    pub endpoint: String,
    pub response_time_ms: i64,
    pub record_count: i64,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording one API call.
#[derive(Debug, Clone)]
pub struct RecordApiCallInput {
    pub company_id: Uuid,
    pub token_id: Option<i64>,
    pub endpoint: String,
    pub response_time_ms: i64,
    pub record_count: i64,
    pub cache_hit: bool,
    pub error: Option<String>,
}

/// Query parameters for listing audit rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLogsQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Pagination envelope for log listings.
#[derive(Debug, Clone, Serialize)]
pub struct LogPagination {
    pub page: i32,
    pub per_page: i32,
    pub total: i64,
    pub total_pages: i32,
}

/// Response body for listing audit rows.
#[derive(Debug, Clone, Serialize)]
pub struct ListLogsResponse {
    pub data: Vec<ApiCallLog>,
    pub pagination: LogPagination,
}
