//! API call log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::ApiCallLog;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the api_call_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct ApiCallLogEntity {
    pub id: i64,
    pub company_id: Uuid,
    pub token_id: Option<i64>,
    pub endpoint: String,
    pub response_time_ms: i64,
    pub record_count: i64,
    pub cache_hit: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiCallLogEntity> for ApiCallLog {
    fn from(entity: ApiCallLogEntity) -> Self {
        ApiCallLog {
            id: entity.id,
            company_id: entity.company_id,
            token_id: entity.token_id,
            endpoint: entity.endpoint,
            response_time_ms: entity.response_time_ms,
            record_count: entity.record_count,
            cache_hit: entity.cache_hit,
            error: entity.error,
            created_at: entity.created_at,
        }
    }
}
