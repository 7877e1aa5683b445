//! Sync and cache admin API routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::SyncRequest;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_token::TokenAuth;
use crate::extractors::OptionalIdempotencyKey;
use crate::services::{IdempotencyOutcome, IdempotencyService, SyncService, SyncServiceError};
use persistence::repositories::CacheRepository;

impl From<SyncServiceError> for ApiError {
    fn from(err: SyncServiceError) -> Self {
        match err {
            SyncServiceError::CompanyNotFound => {
                ApiError::NotFound("Company not found".to_string())
            }
            SyncServiceError::Database(e) => e.into(),
        }
    }
}

fn sync_service(state: &AppState) -> SyncService {
    SyncService::new(
        state.pool.clone(),
        state.config.sync.default_batch_size,
        state.config.alerts.cooldown_minutes,
    )
}

/// POST /api/v1/admin/companies/:company_id/sync
///
/// Run a sync for one company. Supports Idempotency-Key replay so a retried
/// request does not trigger a second run.
pub async fn sync_company(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(company_id): Path<Uuid>,
    OptionalIdempotencyKey(idempotency_key): OptionalIdempotencyKey,
    Json(request): Json<SyncRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let idempotency = IdempotencyService::new(state.pool.clone());
    if let Some(ref key) = idempotency_key {
        match idempotency
            .begin(key, company_id, "admin/companies/sync")
            .await?
        {
            IdempotencyOutcome::Started => {}
            IdempotencyOutcome::Replay(status, body) => {
                return Ok((status, Json(body)).into_response());
            }
            IdempotencyOutcome::InFlight => {
                return Err(ApiError::Conflict(
                    "A request with this Idempotency-Key is already in progress".to_string(),
                ));
            }
        }
    }

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        "Manual sync requested"
    );

    let outcome = match sync_service(&state).sync_company(company_id, &request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(ref key) = idempotency_key {
                idempotency.release(key);
            }
            return Err(e.into());
        }
    };

    let body = serde_json::to_value(&outcome)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize outcome: {}", e)))?;
    if let Some(ref key) = idempotency_key {
        idempotency.complete(key, StatusCode::OK, &body);
    }

    Ok((StatusCode::OK, Json(body)).into_response())
}

/// POST /api/v1/admin/sync
///
/// Run a sync across all active companies. Per-company failures are
/// collected in the summary rather than aborting the run.
pub async fn sync_all(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
) -> Result<impl IntoResponse, ApiError> {
    info!(admin_token_id = auth.token_id, "Manual sync-all requested");

    let summary = sync_service(&state).sync_all().await?;
    Ok(Json(summary))
}

/// Response body for the cache clear endpoint.
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cleared: u64,
}

/// DELETE /api/v1/admin/companies/:company_id/cache
pub async fn clear_cache(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CacheRepository::new(state.pool.clone());
    let cleared = repo.clear_company(company_id).await?;

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        cleared = cleared,
        "Response cache cleared"
    );

    Ok(Json(CacheClearResponse { cleared }))
}
