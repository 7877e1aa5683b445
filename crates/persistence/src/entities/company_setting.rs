//! Company setting entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the company_settings table.
///
/// Settings are sparse: only names a company has explicitly saved have a
/// row. Readers fold rows into `domain::models::ReportSettings`.
#[derive(Debug, Clone, FromRow)]
pub struct CompanySettingEntity {
    pub id: i64,
    pub company_id: Uuid,
    pub setting_name: String,
    pub setting_value: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_fields() {
        let entity = CompanySettingEntity {
            id: 1,
            company_id: Uuid::new_v4(),
            setting_name: "cache_ttl_seconds".to_string(),
            setting_value: "300".to_string(),
            updated_at: Utc::now(),
        };
        assert_eq!(entity.setting_name, "cache_ttl_seconds");
        assert_eq!(entity.setting_value, "300");
    }
}
