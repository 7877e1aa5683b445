//! Alert domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "info"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(AlertSeverity::Info),
            "warning" => Ok(AlertSeverity::Warning),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(format!("Unknown alert severity: {}", other)),
        }
    }
}

/// An append-only alert row.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: i64,
    /// None for alerts not tied to a specific company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    /// Machine-readable type, e.g. `sync_failure`. Cooldown suppression is
    /// keyed on (company_id, alert_type).
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for raising an alert.
#[derive(Debug, Clone)]
pub struct RaiseAlertInput {
    pub company_id: Option<Uuid>,
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Query parameters for listing alerts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAlertsQuery {
    pub resolved: Option<bool>,
    pub severity: Option<AlertSeverity>,
    pub company_id: Option<Uuid>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display_roundtrip() {
        for severity in [
            AlertSeverity::Info,
            AlertSeverity::Warning,
            AlertSeverity::Critical,
        ] {
            let parsed: AlertSeverity = severity.to_string().parse().unwrap();
            assert_eq!(parsed, severity);
        }
    }

    #[test]
    fn test_severity_parse_unknown() {
        assert!("fatal".parse::<AlertSeverity>().is_err());
    }

    #[test]
    fn test_alert_serialize_unresolved() {
        let alert = Alert {
            id: 1,
            company_id: Some(Uuid::new_v4()),
            alert_type: "sync_failure".to_string(),
            severity: AlertSeverity::Warning,
            message: "sync failed for company".to_string(),
            resolved: false,
            resolved_at: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["resolved"], false);
        assert!(json.get("resolved_at").is_none());
    }

    #[test]
    fn test_list_alerts_query_deserialize() {
        let query: ListAlertsQuery =
            serde_json::from_str(r#"{"resolved":false,"severity":"critical"}"#).unwrap();
        assert_eq!(query.resolved, Some(false));
        assert_eq!(query.severity, Some(AlertSeverity::Critical));
        assert_eq!(query.company_id, None);
    }

    #[test]
    fn test_list_query_accepts_company_filter() {
        let query: ListAlertsQuery = serde_json::from_str(
            r#"{"company_id":"0b0e8a6e-2f3d-4d38-9a7f-3a1c5b2f9d11"}"#,
        )
        .unwrap();
        assert!(query.company_id.is_some());
        assert_eq!(query.resolved, None);
    }
}
