//! Company settings reads and writes.

use std::collections::BTreeMap;

use domain::models::{
    validate_setting, ReportSettings, SettingError, SettingsResponse, UpdateSettingsRequest,
};
use persistence::repositories::{CacheRepository, CompanySettingRepository};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error(transparent)]
    Invalid(#[from] SettingError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Reads and writes a company's sparse settings rows.
#[derive(Clone)]
pub struct SettingsService {
    settings: CompanySettingRepository,
    cache: CacheRepository,
}

impl SettingsService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            settings: CompanySettingRepository::new(pool.clone()),
            cache: CacheRepository::new(pool),
        }
    }

    /// Stored rows plus the effective view, for the settings endpoint.
    pub async fn get(&self, company_id: Uuid) -> Result<SettingsResponse, sqlx::Error> {
        let rows = self.stored_rows(company_id).await?;
        Ok(SettingsResponse::from_rows(rows))
    }

    /// The effective typed settings, for sync and report code.
    pub async fn effective(&self, company_id: Uuid) -> Result<ReportSettings, sqlx::Error> {
        let rows = self.stored_rows(company_id).await?;
        Ok(ReportSettings::from_rows(
            rows.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }

    /// Validate and upsert a batch of settings.
    ///
    /// All names and values are validated before anything is written, so a
    /// bad entry rejects the whole request. Cached report responses for the
    /// company are dropped afterwards since visibility may have changed.
    pub async fn update(
        &self,
        company_id: Uuid,
        request: &UpdateSettingsRequest,
    ) -> Result<SettingsResponse, SettingsServiceError> {
        for (name, value) in &request.settings {
            validate_setting(name, value)?;
        }

        for (name, value) in &request.settings {
            self.settings.upsert(company_id, name, value).await?;
        }

        let cleared = self.cache.clear_company(company_id).await?;
        if cleared > 0 {
            tracing::info!(
                company_id = %company_id,
                cleared = cleared,
                "Cleared cached responses after settings update"
            );
        }

        let rows = self.stored_rows(company_id).await?;
        Ok(SettingsResponse::from_rows(rows))
    }

    async fn stored_rows(
        &self,
        company_id: Uuid,
    ) -> Result<BTreeMap<String, String>, sqlx::Error> {
        let entities = self.settings.list_for_company(company_id).await?;
        Ok(entities
            .into_iter()
            .map(|e| (e.setting_name, e.setting_value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use domain::models::validate_setting;

    #[test]
    fn test_setting_validation_reachable_from_models() {
        assert!(validate_setting("field_email", "0").is_ok());
        assert!(validate_setting("theme", "dark").is_err());
    }
}
