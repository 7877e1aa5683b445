//! Sync state entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sync_state table.
///
/// One row per company; `last_synced_at` is the incremental-sync cutoff.
#[derive(Debug, Clone, FromRow)]
pub struct SyncStateEntity {
    pub company_id: Uuid,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_full_sync_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
