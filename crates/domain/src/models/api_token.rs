//! API token domain models.
//!
//! Tokens are bearer credentials mapped to a company. The raw value is
//! returned exactly once at issue time; only its SHA-256 hash is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Metadata about an issued API token (never contains the raw value).
#[derive(Debug, Clone, Serialize)]
pub struct ApiToken {
    pub id: i64,
    pub company_id: Uuid,
    pub name: String,
    /// First 8 characters after the `crt_` prefix, for identification.
    pub token_prefix: String,
    /// Admin tokens may manage companies, settings, and sync.
    pub is_admin: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request body for issuing a token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueTokenRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response returned once at issue time, carrying the raw token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokenResponse {
    /// Raw bearer token. Not recoverable after this response.
    pub token: String,
    #[serde(flatten)]
    pub info: ApiToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token() -> ApiToken {
        ApiToken {
            id: 7,
            company_id: Uuid::new_v4(),
            name: "reporting integration".to_string(),
            token_prefix: "abcdefgh".to_string(),
            is_admin: false,
            is_active: true,
            expires_at: None,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_api_token_serialize_skips_absent_fields() {
        let json = serde_json::to_value(sample_token()).unwrap();
        assert!(json.get("expires_at").is_none());
        assert!(json.get("last_used_at").is_none());
        assert_eq!(json["token_prefix"], "abcdefgh");
    }

    #[test]
    fn test_issue_token_request_defaults() {
        let req: IssueTokenRequest =
            serde_json::from_str(r#"{"name":"ci token"}"#).unwrap();
        assert!(!req.is_admin);
        assert!(req.expires_at.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_issue_token_request_empty_name() {
        let req: IssueTokenRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_issued_token_response_flattens_info() {
        let response = IssuedTokenResponse {
            token: "crt_abc".to_string(),
            info: sample_token(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "crt_abc");
        assert_eq!(json["name"], "reporting integration");
    }
}
