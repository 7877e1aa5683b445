//! Alert admin API routes.

use axum::{
    extract::{Extension, Path, Query, State},
    response::IntoResponse,
    Json,
};
use domain::models::ListAlertsQuery;
use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_token::TokenAuth;
use domain::models::Alert;
use persistence::repositories::AlertRepository;

const DEFAULT_PER_PAGE: i32 = 50;
const MAX_PER_PAGE: i32 = 500;

/// Response body for the alert listing.
#[derive(Debug, Serialize)]
pub struct ListAlertsResponse {
    pub data: Vec<Alert>,
    pub total: i64,
}

/// GET /api/v1/admin/alerts
///
/// List alerts newest first, optionally filtered by resolution state,
/// severity, and company.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let repo = AlertRepository::new(state.pool.clone());
    let (data, total) = repo.list(&query, page as i64, per_page as i64).await?;

    Ok(Json(ListAlertsResponse { data, total }))
}

/// POST /api/v1/admin/alerts/:alert_id/resolve
///
/// Resolving an alert ends its cooldown window, so the next occurrence of
/// the same condition raises a fresh alert immediately.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(alert_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AlertRepository::new(state.pool.clone());
    let alert = repo.resolve(alert_id).await?;

    info!(
        admin_token_id = auth.token_id,
        alert_id = alert_id,
        alert_type = %alert.alert_type,
        "Alert resolved"
    );

    Ok(Json(alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::AlertSeverity;

    #[test]
    fn test_list_alerts_response_serializes() {
        let response = ListAlertsResponse {
            data: vec![Alert {
                id: 1,
                company_id: None,
                alert_type: "sync_failure".to_string(),
                severity: AlertSeverity::Critical,
                message: "boom".to_string(),
                resolved: false,
                resolved_at: None,
                created_at: Utc::now(),
            }],
            total: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["alert_type"], "sync_failure");
    }
}
