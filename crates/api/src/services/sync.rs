//! Reporting table sync engine.
//!
//! Projects the live enrolment/completion tables into the denormalized
//! reporting table, in batches, per company. Orphaned rows are soft-deleted
//! and the per-company cutoff advanced so incremental runs only touch
//! changed rows.

use chrono::Utc;
use domain::models::{
    AlertSeverity, RaiseAlertInput, SyncError, SyncMode, SyncOutcome, SyncRequest, SyncRunSummary,
};
use persistence::repositories::{
    CacheRepository, CompanyRepository, ReportingRecordRepository, SyncStateRepository,
};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::alerts::AlertService;
use super::settings::SettingsService;
use crate::middleware::metrics;

/// Alert type raised when a company's sync run fails.
pub const SYNC_FAILURE_ALERT: &str = "sync_failure";

#[derive(Debug, Error)]
pub enum SyncServiceError {
    #[error("Company not found")]
    CompanyNotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Orchestrates sync runs for one company or all active companies.
#[derive(Clone)]
pub struct SyncService {
    companies: CompanyRepository,
    records: ReportingRecordRepository,
    state: SyncStateRepository,
    cache: CacheRepository,
    settings: SettingsService,
    alerts: AlertService,
    default_batch_size: i64,
}

impl SyncService {
    pub fn new(pool: PgPool, default_batch_size: i64, alert_cooldown_minutes: i64) -> Self {
        Self {
            companies: CompanyRepository::new(pool.clone()),
            records: ReportingRecordRepository::new(pool.clone()),
            state: SyncStateRepository::new(pool.clone()),
            cache: CacheRepository::new(pool.clone()),
            settings: SettingsService::new(pool.clone()),
            alerts: AlertService::new(pool, alert_cooldown_minutes),
            default_batch_size,
        }
    }

    /// Sync a single company, raising a sync_failure alert on error.
    pub async fn sync_company(
        &self,
        company_id: Uuid,
        request: &SyncRequest,
    ) -> Result<SyncOutcome, SyncServiceError> {
        match self.run_sync(company_id, request).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                metrics::record_sync_failure();
                self.alerts.raise_async(RaiseAlertInput {
                    company_id: Some(company_id),
                    alert_type: SYNC_FAILURE_ALERT.to_string(),
                    severity: AlertSeverity::Critical,
                    message: format!("Sync failed: {}", err),
                });
                Err(err)
            }
        }
    }

    /// Sync every active company, continuing past per-company failures.
    pub async fn sync_all(&self) -> Result<SyncRunSummary, sqlx::Error> {
        let companies = self.companies.list_active().await?;
        let mut summary = SyncRunSummary::begin();

        tracing::info!(companies = companies.len(), "Starting sync run");

        for company in companies {
            match self.sync_company(company.id, &SyncRequest::default()).await {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(err) => {
                    tracing::error!(
                        company_id = %company.id,
                        shortname = %company.shortname,
                        error = %err,
                        "Company sync failed, continuing"
                    );
                    summary.errors.push(SyncError {
                        company_id: company.id,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            upserted = summary.total_upserted(),
            soft_deleted = summary.total_soft_deleted(),
            failed = summary.errors.len(),
            "Sync run finished"
        );

        Ok(summary)
    }

    async fn run_sync(
        &self,
        company_id: Uuid,
        request: &SyncRequest,
    ) -> Result<SyncOutcome, SyncServiceError> {
        if self.companies.find_by_id(company_id).await?.is_none() {
            return Err(SyncServiceError::CompanyNotFound);
        }

        let settings = self.settings.effective(company_id).await?;
        let mode = request.mode.unwrap_or(settings.sync_mode);
        let batch_size = request
            .batch_size
            .or(settings.batch_size)
            .unwrap_or(self.default_batch_size)
            .max(1);

        // The cutoff is captured before reading, so rows changed mid-run are
        // picked up again by the next incremental pass.
        let started = Utc::now();
        let run_start = std::time::Instant::now();

        let since = match mode {
            SyncMode::Full => None,
            SyncMode::Incremental => self
                .state
                .find(company_id)
                .await?
                .and_then(|s| s.last_synced_at),
        };
        // An incremental run with no prior cutoff is effectively full.
        let effective_full = since.is_none();

        tracing::info!(
            company_id = %company_id,
            mode = %mode,
            batch_size = batch_size,
            since = ?since,
            "Syncing company"
        );

        let mut upserted = 0u64;
        let mut offset = 0i64;
        loop {
            let rows = self
                .records
                .fetch_live_rows(company_id, since, batch_size, offset)
                .await?;
            let fetched = rows.len() as i64;
            if fetched == 0 {
                break;
            }

            upserted += self.records.upsert_many(company_id, &rows).await?;
            offset += fetched;

            if fetched < batch_size {
                break;
            }
        }

        let soft_deleted = self.records.soft_delete_orphans(company_id).await?;

        self.state
            .record_sync(company_id, started, effective_full)
            .await?;

        // Cached responses are stale the moment rows change.
        self.cache.clear_company(company_id).await?;

        metrics::record_sync_outcome(upserted, soft_deleted);

        let outcome = SyncOutcome {
            company_id,
            mode,
            upserted,
            soft_deleted,
            elapsed_ms: run_start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            company_id = %company_id,
            upserted = outcome.upserted,
            soft_deleted = outcome.soft_deleted,
            elapsed_ms = outcome.elapsed_ms,
            "Company sync completed"
        );

        Ok(outcome)
    }
}
