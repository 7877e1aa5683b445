//! Completion report domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::settings::ReportSettings;

/// Completion state of a user within a course, derived from the live
/// enrolment and completion rows at sync time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    NotStarted,
    Enrolled,
    InProgress,
    Completed,
}

impl CompletionStatus {
    /// Derives the status from completion timestamps.
    ///
    /// `completion_row_exists` distinguishes "enrolled, tracking not begun"
    /// from "tracked but not started".
    pub fn derive(
        completion_row_exists: bool,
        time_started: Option<DateTime<Utc>>,
        time_completed: Option<DateTime<Utc>>,
    ) -> Self {
        if time_completed.is_some() {
            CompletionStatus::Completed
        } else if time_started.is_some() {
            CompletionStatus::InProgress
        } else if completion_row_exists {
            CompletionStatus::NotStarted
        } else {
            CompletionStatus::Enrolled
        }
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionStatus::NotStarted => write!(f, "not_started"),
            CompletionStatus::Enrolled => write!(f, "enrolled"),
            CompletionStatus::InProgress => write!(f, "in_progress"),
            CompletionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for CompletionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(CompletionStatus::NotStarted),
            "enrolled" => Ok(CompletionStatus::Enrolled),
            "in_progress" => Ok(CompletionStatus::InProgress),
            "completed" => Ok(CompletionStatus::Completed),
            other => Err(format!("Unknown completion status: {}", other)),
        }
    }
}

/// A denormalized completion row as served by the report API.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub course_fullname: String,
    pub course_shortname: String,
    pub status: CompletionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_enrolled: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_completed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_grade: Option<f64>,
    pub is_deleted: bool,
    pub last_updated: DateTime<Utc>,
}

impl CompletionRecord {
    /// Serializes the record keeping only fields visible per company
    /// settings. Row identity (`id`, `user_id`, `course_id`, `is_deleted`,
    /// `last_updated`) is always included.
    pub fn to_visible_json(&self, settings: &ReportSettings) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(ref mut map) = value {
            map.retain(|key, _| {
                matches!(
                    key.as_str(),
                    "id" | "user_id" | "course_id" | "is_deleted" | "last_updated"
                ) || settings.is_visible(key)
            });
        }
        value
    }
}

/// Query parameters accepted by the report endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub user_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<CompletionStatus>,
    /// Only rows updated at or after this instant.
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_deleted: bool,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl ReportQuery {
    /// Canonical (name, value) pairs for cache-key construction.
    /// Pagination parameters are excluded; cursored pages bypass the cache.
    pub fn cache_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(user_id) = self.user_id {
            params.push(("user_id".to_string(), user_id.to_string()));
        }
        if let Some(course_id) = self.course_id {
            params.push(("course_id".to_string(), course_id.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.to_string()));
        }
        if let Some(since) = self.since {
            params.push(("since".to_string(), since.to_rfc3339()));
        }
        if self.include_deleted {
            params.push(("include_deleted".to_string(), "true".to_string()));
        }
        params
    }

    /// Whether this request shape is eligible for whole-response caching.
    pub fn is_cacheable(&self) -> bool {
        self.cursor.is_none() && self.limit.is_none()
    }
}

/// One page of report rows.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub company_id: Uuid,
    pub records: Vec<serde_json::Value>,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Export format for the report download endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// MIME type for the download response.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    /// File extension for the attachment name.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> CompletionRecord {
        CompletionRecord {
            id: 1,
            user_id: 42,
            course_id: 7,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            department: Some("Sales".to_string()),
            course_fullname: "Workplace Safety".to_string(),
            course_shortname: "safety101".to_string(),
            status: CompletionStatus::Completed,
            time_enrolled: Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()),
            time_started: Some(Utc.with_ymd_and_hms(2025, 1, 11, 8, 0, 0).unwrap()),
            time_completed: Some(Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap()),
            final_grade: Some(87.5),
            is_deleted: false,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_status_derivation_completed() {
        let now = Some(Utc::now());
        assert_eq!(
            CompletionStatus::derive(true, now, now),
            CompletionStatus::Completed
        );
    }

    #[test]
    fn test_status_derivation_in_progress() {
        assert_eq!(
            CompletionStatus::derive(true, Some(Utc::now()), None),
            CompletionStatus::InProgress
        );
    }

    #[test]
    fn test_status_derivation_not_started() {
        assert_eq!(
            CompletionStatus::derive(true, None, None),
            CompletionStatus::NotStarted
        );
    }

    #[test]
    fn test_status_derivation_enrolled_only() {
        assert_eq!(
            CompletionStatus::derive(false, None, None),
            CompletionStatus::Enrolled
        );
    }

    #[test]
    fn test_status_display_roundtrip() {
        for status in [
            CompletionStatus::NotStarted,
            CompletionStatus::Enrolled,
            CompletionStatus::InProgress,
            CompletionStatus::Completed,
        ] {
            let parsed: CompletionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_to_visible_json_filters_hidden_fields() {
        let mut settings = ReportSettings::default();
        settings.visible_fields.remove("email");
        settings.visible_fields.remove("final_grade");

        let json = sample_record().to_visible_json(&settings);
        assert!(json.get("email").is_none());
        assert!(json.get("final_grade").is_none());
        assert_eq!(json["username"], "jdoe");
        // Identity fields survive regardless of visibility
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["course_id"], 7);
    }

    #[test]
    fn test_to_visible_json_all_visible() {
        let json = sample_record().to_visible_json(&ReportSettings::default());
        assert_eq!(json["email"], "jdoe@example.com");
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn test_report_query_cache_params_canonical() {
        let query = ReportQuery {
            user_id: Some(42),
            course_id: None,
            status: Some(CompletionStatus::Completed),
            since: None,
            include_deleted: false,
            cursor: None,
            limit: None,
        };
        let params = query.cache_params();
        assert_eq!(
            params,
            vec![
                ("user_id".to_string(), "42".to_string()),
                ("status".to_string(), "completed".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_query_cacheable() {
        assert!(ReportQuery::default().is_cacheable());
        let cursored = ReportQuery {
            cursor: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(!cursored.is_cacheable());
        let limited = ReportQuery {
            limit: Some(10),
            ..Default::default()
        };
        assert!(!limited.is_cacheable());
    }

    #[test]
    fn test_export_format_default_and_parse() {
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
        let format: ExportFormat = serde_json::from_str(r#""csv""#).unwrap();
        assert_eq!(format, ExportFormat::Csv);
        assert_eq!(format.content_type(), "text/csv");
        assert_eq!(format.extension(), "csv");
    }

    #[test]
    fn test_report_query_deserialize() {
        let query: ReportQuery = serde_json::from_str(
            r#"{"user_id":1,"status":"in_progress","include_deleted":true}"#,
        )
        .unwrap();
        assert_eq!(query.user_id, Some(1));
        assert_eq!(query.status, Some(CompletionStatus::InProgress));
        assert!(query.include_deleted);
    }
}
