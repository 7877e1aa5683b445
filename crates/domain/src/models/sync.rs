//! Sync run domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::settings::SyncMode;

/// Request body for the manual sync endpoint. Absent fields fall back to
/// the company's settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncRequest {
    pub mode: Option<SyncMode>,
    pub batch_size: Option<i64>,
}

/// Result of syncing one company.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub company_id: Uuid,
    pub mode: SyncMode,
    /// Rows inserted or refreshed in the reporting table.
    pub upserted: u64,
    /// Rows newly marked as orphaned.
    pub soft_deleted: u64,
    pub elapsed_ms: u64,
}

/// A company that failed during a sync-all run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncError {
    pub company_id: Uuid,
    pub message: String,
}

/// Summary of a sync run across one or more companies.
///
/// A failing company never aborts the run; its error is collected here.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRunSummary {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<SyncOutcome>,
    pub errors: Vec<SyncError>,
}

impl SyncRunSummary {
    /// Starts an empty summary stamped with the current time.
    pub fn begin() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Total rows upserted across all companies.
    pub fn total_upserted(&self) -> u64 {
        self.outcomes.iter().map(|o| o.upserted).sum()
    }

    /// Total rows soft-deleted across all companies.
    pub fn total_soft_deleted(&self) -> u64 {
        self.outcomes.iter().map(|o| o.soft_deleted).sum()
    }

    /// True when at least one company succeeded.
    pub fn any_succeeded(&self) -> bool {
        !self.outcomes.is_empty()
    }
}
