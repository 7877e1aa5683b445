//! Scheduled reporting-table sync job.

use crate::jobs::scheduler::{Job, JobFrequency};
use crate::services::SyncService;

/// Runs a sync across all active companies on a fixed interval.
pub struct ScheduledSyncJob {
    service: SyncService,
    interval_minutes: u64,
}

impl ScheduledSyncJob {
    pub fn new(service: SyncService, interval_minutes: u64) -> Self {
        Self {
            service,
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for ScheduledSyncJob {
    fn name(&self) -> &'static str {
        "scheduled_sync"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        let summary = self
            .service
            .sync_all()
            .await
            .map_err(|e| format!("Sync run failed to start: {}", e))?;

        // Per-company failures are alerted individually by the sync service;
        // the job only fails when nothing could be synced at all.
        if !summary.any_succeeded() && !summary.errors.is_empty() {
            return Err(format!("All {} companies failed to sync", summary.errors.len()));
        }

        Ok(())
    }
}
