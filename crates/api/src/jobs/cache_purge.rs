//! Expired response-cache purge job.

use persistence::repositories::CacheRepository;
use sqlx::PgPool;

use crate::jobs::scheduler::{Job, JobFrequency};

/// Deletes expired cache entries on a fixed interval.
pub struct CachePurgeJob {
    repo: CacheRepository,
    interval_minutes: u64,
}

impl CachePurgeJob {
    pub fn new(pool: PgPool, interval_minutes: u64) -> Self {
        Self {
            repo: CacheRepository::new(pool),
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for CachePurgeJob {
    fn name(&self) -> &'static str {
        "cache_purge"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self
            .repo
            .delete_expired()
            .await
            .map_err(|e| format!("Failed to purge cache entries: {}", e))?;

        if removed > 0 {
            tracing::info!(removed = removed, "Purged expired cache entries");
        }

        Ok(())
    }
}
