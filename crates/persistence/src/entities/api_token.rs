//! API token entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::ApiToken;

/// Database row mapping for the api_tokens table.
///
/// Carries the stored token hash; the hash never crosses into the domain
/// model.
#[derive(Debug, Clone, FromRow)]
pub struct ApiTokenEntity {
    pub id: i64,
    pub company_id: Uuid,
    pub name: String,
    pub token_prefix: String,
    pub token_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiTokenEntity> for ApiToken {
    fn from(entity: ApiTokenEntity) -> Self {
        ApiToken {
            id: entity.id,
            company_id: entity.company_id,
            name: entity.name,
            token_prefix: entity.token_prefix,
            is_admin: entity.is_admin,
            is_active: entity.is_active,
            expires_at: entity.expires_at,
            last_used_at: entity.last_used_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> ApiTokenEntity {
        ApiTokenEntity {
            id: 3,
            company_id: Uuid::new_v4(),
            name: "ci token".to_string(),
            token_prefix: "abcdefgh".to_string(),
            token_hash: "f".repeat(64),
            is_admin: false,
            is_active: true,
            expires_at: None,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_conversion_drops_hash() {
        let token: ApiToken = sample_entity().into();
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("token_hash").is_none());
        assert_eq!(json["token_prefix"], "abcdefgh");
    }
}
