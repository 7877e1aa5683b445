//! Company settings repository for database operations.
//!
//! Settings are sparse key/value rows; absent rows mean "use the default".

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CompanySettingEntity;

/// Repository for company setting database operations.
#[derive(Clone)]
pub struct CompanySettingRepository {
    pool: PgPool,
}

impl CompanySettingRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch all stored settings for a company.
    pub async fn list_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CompanySettingEntity>, sqlx::Error> {
        sqlx::query_as::<_, CompanySettingEntity>(
            r#"
            SELECT id, company_id, setting_name, setting_value, updated_at
            FROM company_settings
            WHERE company_id = $1
            ORDER BY setting_name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert or update a single setting.
    pub async fn upsert(
        &self,
        company_id: Uuid,
        setting_name: &str,
        setting_value: &str,
    ) -> Result<CompanySettingEntity, sqlx::Error> {
        sqlx::query_as::<_, CompanySettingEntity>(
            r#"
            INSERT INTO company_settings (company_id, setting_name, setting_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, setting_name)
            DO UPDATE SET setting_value = EXCLUDED.setting_value, updated_at = NOW()
            RETURNING id, company_id, setting_name, setting_value, updated_at
            "#,
        )
        .bind(company_id)
        .bind(setting_name)
        .bind(setting_value)
        .fetch_one(&self.pool)
        .await
    }
}
