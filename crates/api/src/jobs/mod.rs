//! Background jobs.

pub mod cache_purge;
pub mod idempotency_cleanup;
pub mod log_retention;
pub mod scheduled_sync;
pub mod scheduler;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::SyncService;
use cache_purge::CachePurgeJob;
use idempotency_cleanup::IdempotencyCleanupJob;
use log_retention::LogRetentionJob;
use scheduled_sync::ScheduledSyncJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};

/// Build the scheduler with all configured background jobs.
///
/// A sync interval of 0 disables the scheduled sync (manual and CLI sync
/// still work).
pub fn build_scheduler(config: &Config, pool: PgPool) -> JobScheduler {
    let mut scheduler = JobScheduler::new();

    if config.sync.interval_minutes > 0 {
        let service = SyncService::new(
            pool.clone(),
            config.sync.default_batch_size,
            config.alerts.cooldown_minutes,
        );
        scheduler.register(ScheduledSyncJob::new(service, config.sync.interval_minutes));
    }

    scheduler.register(CachePurgeJob::new(
        pool.clone(),
        config.cache.purge_interval_minutes,
    ));
    scheduler.register(LogRetentionJob::new(
        pool.clone(),
        config.retention.api_log_days,
        config.retention.resolved_alert_days,
    ));
    scheduler.register(IdempotencyCleanupJob::new(
        pool,
        config.retention.idempotency_key_hours,
    ));

    scheduler
}
