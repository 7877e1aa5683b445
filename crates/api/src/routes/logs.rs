//! API call log admin routes.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use domain::models::{ListLogsQuery, ListLogsResponse, LogPagination};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::{ApiCallLogRepository, CompanyRepository};

const DEFAULT_PER_PAGE: i32 = 50;
const MAX_PER_PAGE: i32 = 500;

/// GET /api/v1/admin/companies/:company_id/logs
///
/// Paged API call history for a company, newest first.
pub async fn list_logs(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListLogsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = CompanyRepository::new(state.pool.clone());
    if companies.find_by_id(company_id).await?.is_none() {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let repo = ApiCallLogRepository::new(state.pool.clone());
    let (data, total) = repo
        .list(company_id, &query, page as i64, per_page as i64)
        .await?;

    let total_pages = ((total as f64) / (per_page as f64)).ceil() as i32;

    Ok(Json(ListLogsResponse {
        data,
        pagination: LogPagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_total_pages_rounding() {
        let total = 101i64;
        let per_page = 50i32;
        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i32;
        assert_eq!(total_pages, 3);
    }
}
