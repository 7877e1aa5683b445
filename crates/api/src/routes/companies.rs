//! Company and token admin API routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{CreateCompanyRequest, IssueTokenRequest, IssuedTokenResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_token::TokenAuth;
use crate::extractors::OptionalIdempotencyKey;
use crate::services::{IdempotencyOutcome, IdempotencyService};
use persistence::repositories::{ApiTokenRepository, CompanyRepository};
use shared::crypto::{extract_token_prefix, generate_token, sha256_hex};

/// GET /api/v1/admin/companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CompanyRepository::new(state.pool.clone());
    let companies = repo.list().await?;
    Ok(Json(companies))
}

/// GET /api/v1/admin/companies/:company_id
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}

/// POST /api/v1/admin/companies
///
/// Create a company. Supports Idempotency-Key replay.
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    OptionalIdempotencyKey(idempotency_key): OptionalIdempotencyKey,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let idempotency = IdempotencyService::new(state.pool.clone());
    if let Some(ref key) = idempotency_key {
        // Reserved under the caller's company; the new company does not
        // exist yet at this point.
        match idempotency.begin(key, auth.company_id, "admin/companies").await? {
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

    let repo = CompanyRepository::new(state.pool.clone());
    let company = match repo.create(&request).await {
        Ok(company) => company,
        Err(e) => {
            if let Some(ref key) = idempotency_key {
                idempotency.release(key);
            }
            return Err(e.into());
        }
    };

    info!(
        admin_token_id = auth.token_id,
        company_id = %company.id,
        shortname = %company.shortname,
        "Company created"
    );

    let body = serde_json::to_value(&company)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize company: {}", e)))?;
    if let Some(ref key) = idempotency_key {
        idempotency.complete(key, StatusCode::CREATED, &body);
    }

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// Request body for toggling a company's suspended flag.
#[derive(Debug, Deserialize)]
pub struct SuspendRequest {
    pub suspended: bool,
}

/// PUT /api/v1/admin/companies/:company_id/suspend
///
/// Suspended companies keep their data but are skipped by scheduled sync.
pub async fn set_suspended(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<SuspendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo.set_suspended(company_id, request.suspended).await?;

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        suspended = request.suspended,
        "Company suspended flag updated"
    );

    Ok(Json(company))
}

/// POST /api/v1/admin/companies/:company_id/tokens
///
/// Issue a new API token. The plaintext token appears in this response only;
/// the database stores its SHA-256 hash.
pub async fn issue_token(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let companies = CompanyRepository::new(state.pool.clone());
    if companies.find_by_id(company_id).await?.is_none() {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let token = generate_token();
    let token_hash = sha256_hex(&token);
    let token_prefix = extract_token_prefix(&token)
        .ok_or_else(|| ApiError::Internal("Generated token has invalid shape".to_string()))?;

    let repo = ApiTokenRepository::new(state.pool.clone());
    let info = repo
        .insert(
            company_id,
            &request.name,
            token_prefix,
            &token_hash,
            request.is_admin,
            request.expires_at,
        )
        .await?;

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        token_id = info.id,
        token_prefix = %info.token_prefix,
        is_admin = info.is_admin,
        "API token issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(IssuedTokenResponse { token, info }),
    ))
}

/// GET /api/v1/admin/companies/:company_id/tokens
pub async fn list_tokens(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ApiTokenRepository::new(state.pool.clone());
    let tokens = repo.list_for_company(company_id).await?;
    Ok(Json(tokens))
}

/// DELETE /api/v1/admin/companies/:company_id/tokens/:token_id
///
/// Revoke (deactivate) a token. Revoked tokens fail authentication
/// immediately; the row is kept for the audit trail.
pub async fn revoke_token(
    State(state): State<AppState>,
    Extension(auth): Extension<TokenAuth>,
    Path((company_id, token_id)): Path<(Uuid, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ApiTokenRepository::new(state.pool.clone());
    let revoked = repo.revoke(token_id, company_id).await?;
    if !revoked {
        return Err(ApiError::NotFound("Token not found".to_string()));
    }

    info!(
        admin_token_id = auth.token_id,
        company_id = %company_id,
        token_id = token_id,
        "API token revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspend_request_deserialize() {
        let request: SuspendRequest = serde_json::from_str(r#"{"suspended":true}"#).unwrap();
        assert!(request.suspended);
    }
}
