//! Per-company report settings.
//!
//! Settings are stored as sparse (company_id, name, value) rows and folded
//! into a typed [`ReportSettings`] view with defaults for absent keys.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Report columns that can be toggled per company via `field_<name>` settings.
pub const REPORT_FIELDS: &[&str] = &[
    "username",
    "email",
    "first_name",
    "last_name",
    "department",
    "course_fullname",
    "course_shortname",
    "status",
    "time_enrolled",
    "time_started",
    "time_completed",
    "final_grade",
];

/// Setting name for the sync mode.
pub const SETTING_SYNC_MODE: &str = "sync_mode";
/// Setting name for the response-cache TTL in seconds.
pub const SETTING_CACHE_TTL: &str = "cache_ttl_seconds";
/// Setting name for the sync batch size.
pub const SETTING_BATCH_SIZE: &str = "batch_size";

const FIELD_PREFIX: &str = "field_";

const MAX_CACHE_TTL_SECONDS: i64 = 86_400;
const MAX_BATCH_SIZE: i64 = 10_000;

/// How the sync engine refreshes a company's reporting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Rebuild every row for the company.
    Full,
    /// Only project rows changed since the stored cutoff.
    #[default]
    Incremental,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Full => write!(f, "full"),
            SyncMode::Incremental => write!(f, "incremental"),
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(SyncMode::Full),
            "incremental" => Ok(SyncMode::Incremental),
            other => Err(SettingError::InvalidValue {
                name: SETTING_SYNC_MODE.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Validation error for a setting row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("Unknown setting: {0}")]
    UnknownName(String),

    #[error("Invalid value '{value}' for setting '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Typed view over a company's sparse settings rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Report fields included in API responses and exports.
    pub visible_fields: BTreeSet<String>,
    pub sync_mode: SyncMode,
    /// None means "use the configured server default".
    pub cache_ttl_seconds: Option<i64>,
    pub batch_size: Option<i64>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            visible_fields: REPORT_FIELDS.iter().map(|f| f.to_string()).collect(),
            sync_mode: SyncMode::default(),
            cache_ttl_seconds: None,
            batch_size: None,
        }
    }
}

impl ReportSettings {
    /// Folds sparse (name, value) rows into a typed view.
    ///
    /// Rows that fail validation are ignored rather than failing the whole
    /// read; writes are validated, so a bad stored row means manual edits.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut settings = Self::default();

        for (name, value) in rows {
            if let Some(field) = name.strip_prefix(FIELD_PREFIX) {
                if REPORT_FIELDS.contains(&field) && value == "0" {
                    settings.visible_fields.remove(field);
                }
                continue;
            }

            match name {
                SETTING_SYNC_MODE => {
                    if let Ok(mode) = value.parse() {
                        settings.sync_mode = mode;
                    }
                }
                SETTING_CACHE_TTL => {
                    if let Ok(ttl) = value.parse::<i64>() {
                        if (1..=MAX_CACHE_TTL_SECONDS).contains(&ttl) {
                            settings.cache_ttl_seconds = Some(ttl);
                        }
                    }
                }
                SETTING_BATCH_SIZE => {
                    if let Ok(size) = value.parse::<i64>() {
                        if (1..=MAX_BATCH_SIZE).contains(&size) {
                            settings.batch_size = Some(size);
                        }
                    }
                }
                _ => {}
            }
        }

        settings
    }

    /// Whether a report field is visible for this company.
    pub fn is_visible(&self, field: &str) -> bool {
        self.visible_fields.contains(field)
    }
}

/// Validates a single setting row before it is upserted.
pub fn validate_setting(name: &str, value: &str) -> Result<(), SettingError> {
    if let Some(field) = name.strip_prefix(FIELD_PREFIX) {
        if !REPORT_FIELDS.contains(&field) {
            return Err(SettingError::UnknownName(name.to_string()));
        }
        return match value {
            "0" | "1" => Ok(()),
            _ => Err(SettingError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
        };
    }

    match name {
        SETTING_SYNC_MODE => value.parse::<SyncMode>().map(|_| ()),
        SETTING_CACHE_TTL => match value.parse::<i64>() {
            Ok(ttl) if (1..=MAX_CACHE_TTL_SECONDS).contains(&ttl) => Ok(()),
            _ => Err(SettingError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
        },
        SETTING_BATCH_SIZE => match value.parse::<i64>() {
            Ok(size) if (1..=MAX_BATCH_SIZE).contains(&size) => Ok(()),
            _ => Err(SettingError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
        },
        other => Err(SettingError::UnknownName(other.to_string())),
    }
}

/// Request body for upserting settings. Keys map to stored setting names.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: BTreeMap<String, String>,
}

/// Response body for reading a company's settings.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    /// Raw stored rows (sparse).
    pub settings: BTreeMap<String, String>,
    /// Effective field visibility after defaults are applied.
    pub visible_fields: Vec<String>,
    pub sync_mode: SyncMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
}

impl SettingsResponse {
    /// Builds the response from stored rows.
    pub fn from_rows(rows: BTreeMap<String, String>) -> Self {
        let effective =
            ReportSettings::from_rows(rows.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Self {
            settings: rows,
            visible_fields: effective.visible_fields.iter().cloned().collect(),
            sync_mode: effective.sync_mode,
            cache_ttl_seconds: effective.cache_ttl_seconds,
            batch_size: effective.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_display_and_parse() {
        assert_eq!(SyncMode::Full.to_string(), "full");
        assert_eq!(SyncMode::Incremental.to_string(), "incremental");
        assert_eq!("full".parse::<SyncMode>().unwrap(), SyncMode::Full);
        assert!("weekly".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_defaults_all_fields_visible() {
        let settings = ReportSettings::default();
        assert_eq!(settings.visible_fields.len(), REPORT_FIELDS.len());
        assert_eq!(settings.sync_mode, SyncMode::Incremental);
        assert!(settings.cache_ttl_seconds.is_none());
        assert!(settings.batch_size.is_none());
    }

    #[test]
    fn test_from_rows_hides_toggled_fields() {
        let settings =
            ReportSettings::from_rows([("field_email", "0"), ("field_department", "0")]);
        assert!(!settings.is_visible("email"));
        assert!(!settings.is_visible("department"));
        assert!(settings.is_visible("username"));
    }

    #[test]
    fn test_from_rows_explicit_enable_is_noop() {
        let settings = ReportSettings::from_rows([("field_email", "1")]);
        assert!(settings.is_visible("email"));
    }

    #[test]
    fn test_from_rows_parses_typed_settings() {
        let settings = ReportSettings::from_rows([
            ("sync_mode", "full"),
            ("cache_ttl_seconds", "120"),
            ("batch_size", "250"),
        ]);
        assert_eq!(settings.sync_mode, SyncMode::Full);
        assert_eq!(settings.cache_ttl_seconds, Some(120));
        assert_eq!(settings.batch_size, Some(250));
    }

    #[test]
    fn test_from_rows_ignores_invalid_stored_values() {
        let settings = ReportSettings::from_rows([
            ("sync_mode", "hourly"),
            ("cache_ttl_seconds", "-5"),
            ("batch_size", "lots"),
            ("field_unknown_column", "0"),
        ]);
        assert_eq!(settings, ReportSettings::default());
    }

    #[test]
    fn test_validate_setting_field_toggle() {
        assert!(validate_setting("field_email", "0").is_ok());
        assert!(validate_setting("field_email", "1").is_ok());
        assert!(validate_setting("field_email", "yes").is_err());
        assert!(matches!(
            validate_setting("field_bogus", "0"),
            Err(SettingError::UnknownName(_))
        ));
    }

    #[test]
    fn test_validate_setting_typed() {
        assert!(validate_setting("sync_mode", "incremental").is_ok());
        assert!(validate_setting("cache_ttl_seconds", "300").is_ok());
        assert!(validate_setting("cache_ttl_seconds", "0").is_err());
        assert!(validate_setting("cache_ttl_seconds", "100000").is_err());
        assert!(validate_setting("batch_size", "500").is_ok());
        assert!(validate_setting("batch_size", "0").is_err());
    }

    #[test]
    fn test_validate_setting_unknown_name() {
        assert_eq!(
            validate_setting("theme_color", "blue"),
            Err(SettingError::UnknownName("theme_color".to_string()))
        );
    }

    #[test]
    fn test_settings_response_from_rows() {
        let mut rows = BTreeMap::new();
        rows.insert("field_email".to_string(), "0".to_string());
        rows.insert("sync_mode".to_string(), "full".to_string());

        let response = SettingsResponse::from_rows(rows);
        assert_eq!(response.sync_mode, SyncMode::Full);
        assert!(!response.visible_fields.contains(&"email".to_string()));
        assert_eq!(response.settings.len(), 2);
    }

    #[test]
    fn test_update_settings_request_deserialize() {
        let json = r#"{"settings":{"field_email":"0","cache_ttl_seconds":"120"}}"#;
        let req: UpdateSettingsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.settings.len(), 2);
        assert_eq!(req.settings.get("field_email"), Some(&"0".to_string()));
    }
}
