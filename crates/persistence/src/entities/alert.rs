//! Alert entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Alert, AlertSeverity};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: i64,
    pub company_id: Option<Uuid>,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<AlertEntity> for Alert {
    fn from(entity: AlertEntity) -> Self {
        // Severity is validated on write; treat anything unexpected as warning.
        let severity = entity
            .severity
            .parse()
            .unwrap_or(AlertSeverity::Warning);

        Alert {
            id: entity.id,
            company_id: entity.company_id,
            alert_type: entity.alert_type,
            severity,
            message: entity.message,
            resolved: entity.resolved,
            resolved_at: entity.resolved_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(severity: &str) -> AlertEntity {
        AlertEntity {
            id: 1,
            company_id: Some(Uuid::new_v4()),
            alert_type: "sync_failure".to_string(),
            severity: severity.to_string(),
            message: "sync failed".to_string(),
            resolved: false,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_severity_parses() {
        let alert: Alert = entity("critical").into();
        assert_eq!(alert.severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_unknown_severity_falls_back_to_warning() {
        let alert: Alert = entity("shrug").into();
        assert_eq!(alert.severity, AlertSeverity::Warning);
    }
}
