//! Bearer token authentication extractor.
//!
//! Validates `Authorization: Bearer crt_...` tokens against the stored
//! SHA-256 hashes.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::ApiTokenRepository;
use shared::crypto::{sha256_hex, TOKEN_PREFIX};

/// Authenticated API token information.
#[derive(Debug, Clone)]
pub struct TokenAuth {
    /// Database ID of the authenticated token.
    pub token_id: i64,
    /// Company the token is scoped to.
    pub company_id: Uuid,
    /// Token prefix for identification in logs.
    pub token_prefix: String,
    /// Whether this token may call the admin API.
    pub is_admin: bool,
}

impl TokenAuth {
    /// Validates a bearer token and returns authentication info.
    ///
    /// This is the core authentication logic, extracted for testability.
    pub async fn validate(pool: &PgPool, token: &str) -> Result<Self, ApiError> {
        // Minimum plausible length: prefix + 32 random chars
        if token.len() < TOKEN_PREFIX.len() + 32 || !token.starts_with(TOKEN_PREFIX) {
            return Err(ApiError::Unauthorized(
                "Invalid or missing API token".to_string(),
            ));
        }

        let token_hash = sha256_hex(token);

        let repo = ApiTokenRepository::new(pool.clone());
        let info = repo
            .find_active_by_hash(&token_hash)
            .await
            .map_err(|e| {
                tracing::error!("Database error during token lookup: {}", e);
                ApiError::Internal("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API token".to_string()))?;

        // Update last_used_at asynchronously (fire and forget)
        repo.touch_last_used(info.id);

        Ok(TokenAuth {
            token_id: info.id,
            company_id: info.company_id,
            token_prefix: info.token_prefix,
            is_admin: info.is_admin,
        })
    }

    /// Pulls the bearer token out of the Authorization header.
    pub fn bearer_token(parts: &Parts) -> Option<&str> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for TokenAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = Self::bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API token".to_string()))?
            .to_string();

        Self::validate(&state.pool, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_auth_struct() {
        let auth = TokenAuth {
            token_id: 1,
            company_id: Uuid::new_v4(),
            token_prefix: "aBcDeFgH".to_string(),
            is_admin: false,
        };
        assert_eq!(auth.token_id, 1);
        assert!(!auth.is_admin);
    }

    #[test]
    fn test_token_auth_clone() {
        let auth = TokenAuth {
            token_id: 7,
            company_id: Uuid::new_v4(),
            token_prefix: "aBcDeFgH".to_string(),
            is_admin: true,
        };
        let cloned = auth.clone();
        assert_eq!(cloned.token_id, auth.token_id);
        assert_eq!(cloned.company_id, auth.company_id);
        assert!(cloned.is_admin);
    }
}
