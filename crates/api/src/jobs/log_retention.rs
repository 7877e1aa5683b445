//! Retention job for API call logs and resolved alerts.

use persistence::repositories::{AlertRepository, ApiCallLogRepository};
use sqlx::PgPool;

use crate::jobs::scheduler::{Job, JobFrequency};

/// Daily cleanup of aged API call logs and resolved alerts.
pub struct LogRetentionJob {
    logs: ApiCallLogRepository,
    alerts: AlertRepository,
    api_log_days: i64,
    resolved_alert_days: i64,
}

impl LogRetentionJob {
    pub fn new(pool: PgPool, api_log_days: i64, resolved_alert_days: i64) -> Self {
        Self {
            logs: ApiCallLogRepository::new(pool.clone()),
            alerts: AlertRepository::new(pool),
            api_log_days,
            resolved_alert_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for LogRetentionJob {
    fn name(&self) -> &'static str {
        "log_retention"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), String> {
        let logs_removed = self
            .logs
            .delete_older_than_days(self.api_log_days)
            .await
            .map_err(|e| format!("Failed to delete aged API call logs: {}", e))?;

        let alerts_removed = self
            .alerts
            .delete_resolved_older_than_days(self.resolved_alert_days)
            .await
            .map_err(|e| format!("Failed to delete aged resolved alerts: {}", e))?;

        tracing::info!(
            logs_removed = logs_removed,
            alerts_removed = alerts_removed,
            "Retention cleanup completed"
        );

        Ok(())
    }
}
