//! Company (tenant) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A tenant served by the reporting backend.
///
/// Every reporting record, setting, cache entry, and API token belongs to
/// exactly one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    /// Unique short identifier used in exports and logs.
    pub shortname: String,
    /// Suspended companies are skipped by the sync loop and rejected at auth.
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a company.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 254, message = "Name must be 1-254 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Shortname must be 1-100 characters"))]
    pub shortname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_company_request_valid() {
        let req = CreateCompanyRequest {
            name: "Acme Training".to_string(),
            shortname: "acme".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_company_request_empty_name() {
        let req = CreateCompanyRequest {
            name: String::new(),
            shortname: "acme".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_company_request_shortname_too_long() {
        let req = CreateCompanyRequest {
            name: "Acme".to_string(),
            shortname: "x".repeat(101),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_company_serialize() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            shortname: "acme".to_string(),
            suspended: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["shortname"], "acme");
        assert_eq!(json["suspended"], false);
    }
}
