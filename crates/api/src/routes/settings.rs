//! Company settings admin API routes.

use axum::{
    extract::{Extension, Path, State},
    response::IntoResponse,
    Json,
};
use domain::models::UpdateSettingsRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_token::TokenAuth;
use crate::services::{SettingsService, SettingsServiceError};
use persistence::repositories::CompanyRepository;

impl From<SettingsServiceError> for ApiError {
    fn from(err: SettingsServiceError) -> Self {
        match err {
            SettingsServiceError::Invalid(e) => e.into(),
            SettingsServiceError::Database(e) => e.into(),
        }
    }
}

/// GET /api/v1/admin/companies/:company_id/settings
///
/// Stored settings rows plus the effective view with defaults applied.
pub async fn get_settings(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = CompanyRepository::new(state.pool.clone());
    if companies.find_by_id(company_id).await?.is_none() {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let service = SettingsService::new(state.pool.clone());
    let response = service.get(company_id).await?;
    Ok(Json(response))
}

/// PUT /api/v1/admin/companies/:company_id/settings
///
/// Upsert a batch of settings. Any invalid name or value rejects the whole
/// request; on success the company's cached responses are dropped.
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = CompanyRepository::new(state.pool.clone());
    if companies.find_by_id(company_id).await?.is_none() {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let service = SettingsService::new(state.pool.clone());
    let response = service.update(company_id, &request).await?;

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        updated = request.settings.len(),
        "Company settings updated"
    );

    Ok(Json(response))
}
