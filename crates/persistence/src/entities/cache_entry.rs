//! Response cache entry entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the cache_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct CacheEntryEntity {
    pub id: i64,
    /// SHA-256 hex over company id + canonical request shape.
    pub cache_key: String,
    pub company_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub hit_count: i64,
}

impl CacheEntryEntity {
    /// Whether the entry is still valid at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(expires_at: DateTime<Utc>) -> CacheEntryEntity {
        CacheEntryEntity {
            id: 1,
            cache_key: "a".repeat(64),
            company_id: Uuid::new_v4(),
            payload: serde_json::json!({"records": []}),
            created_at: Utc::now(),
            expires_at,
            hit_count: 0,
        }
    }

    #[test]
    fn test_is_fresh_before_expiry() {
        let now = Utc::now();
        assert!(entry(now + Duration::seconds(60)).is_fresh(now));
    }

    #[test]
    fn test_is_stale_at_expiry() {
        let now = Utc::now();
        assert!(!entry(now).is_fresh(now));
    }

    #[test]
    fn test_is_stale_after_expiry() {
        let now = Utc::now();
        assert!(!entry(now - Duration::seconds(1)).is_fresh(now));
    }
}
