//! Expired idempotency key cleanup job.

use persistence::repositories::IdempotencyKeyRepository;
use sqlx::PgPool;

use crate::jobs::scheduler::{Job, JobFrequency};

/// Hourly cleanup of expired idempotency keys.
pub struct IdempotencyCleanupJob {
    repo: IdempotencyKeyRepository,
    max_age_hours: i64,
}

impl IdempotencyCleanupJob {
    pub fn new(pool: PgPool, max_age_hours: i64) -> Self {
        Self {
            repo: IdempotencyKeyRepository::new(pool),
            max_age_hours,
        }
    }
}

#[async_trait::async_trait]
impl Job for IdempotencyCleanupJob {
    fn name(&self) -> &'static str {
        "idempotency_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self
            .repo
            .delete_expired()
            .await
            .map_err(|e| format!("Failed to delete expired idempotency keys: {}", e))?;

        let aged_out = self
            .repo
            .delete_older_than_hours(self.max_age_hours)
            .await
            .map_err(|e| format!("Failed to delete aged idempotency keys: {}", e))?;

        if removed + aged_out > 0 {
            tracing::info!(
                removed = removed,
                aged_out = aged_out,
                "Deleted idempotency keys"
            );
        }

        Ok(())
    }
}
