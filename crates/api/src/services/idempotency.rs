//! Idempotent replay for mutating admin endpoints.
//!
//! A key is reserved before the request body runs, so two concurrent
//! requests carrying the same Idempotency-Key cannot both execute: the
//! loser sees the reservation and gets a 409 until the winner's response
//! is stored.

use axum::http::StatusCode;
use persistence::repositories::IdempotencyKeyRepository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::extractors::IdempotencyKey;

/// A pending reservation carries this status until the handler completes.
const PENDING_STATUS: i16 = 0;

/// What `begin` decided about a key.
#[derive(Debug)]
pub enum IdempotencyOutcome {
    /// This caller holds the key; run the request and call `complete`.
    Started,
    /// The key was already completed; return the stored response.
    Replay(StatusCode, serde_json::Value),
    /// Another request holding the key is still running.
    InFlight,
}

/// Classify a stored row: a pending reservation has no response to replay.
fn replay_from(response_status: i16, response_body: serde_json::Value) -> Option<(StatusCode, serde_json::Value)> {
    if response_status == PENDING_STATUS {
        return None;
    }
    let status = StatusCode::from_u16(response_status as u16).unwrap_or(StatusCode::OK);
    Some((status, response_body))
}

/// Stores and replays responses for requests carrying an Idempotency-Key
/// header.
#[derive(Clone)]
pub struct IdempotencyService {
    repo: IdempotencyKeyRepository,
}

impl IdempotencyService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: IdempotencyKeyRepository::new(pool),
        }
    }

    /// Reserve a key or report why the request must not run.
    pub async fn begin(
        &self,
        key: &IdempotencyKey,
        company_id: Uuid,
        endpoint: &str,
    ) -> Result<IdempotencyOutcome, sqlx::Error> {
        if self.repo.insert_pending(&key.hash, company_id, endpoint).await? {
            return Ok(IdempotencyOutcome::Started);
        }

        match self.repo.find_valid(&key.hash).await? {
            Some(entity) => Ok(match replay_from(entity.response_status, entity.response_body) {
                Some((status, body)) => IdempotencyOutcome::Replay(status, body),
                None => IdempotencyOutcome::InFlight,
            }),
            // The row vanished between insert and lookup (expiry sweep or a
            // released reservation). Let the client retry.
            None => Ok(IdempotencyOutcome::InFlight),
        }
    }

    /// Record the response produced for a reserved key (fire and forget).
    pub fn complete(&self, key: &IdempotencyKey, status: StatusCode, body: &serde_json::Value) {
        let repo = self.repo.clone();
        let hash = key.hash.clone();
        let body = body.clone();
        let status = status.as_u16() as i16;
        tokio::spawn(async move {
            if let Err(e) = repo.complete(&hash, status, &body).await {
                tracing::warn!(error = %e, "Failed to store idempotency response");
            }
        });
    }

    /// Drop a reservation whose request failed, so a retry can run.
    pub fn release(&self, key: &IdempotencyKey) {
        let repo = self.repo.clone();
        let hash = key.hash.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.release(&hash).await {
                tracing::warn!(error = %e, "Failed to release idempotency key");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_reservation_is_not_replayable() {
        assert!(replay_from(PENDING_STATUS, json!({})).is_none());
    }

    #[test]
    fn test_completed_key_replays_stored_response() {
        let (status, body) = replay_from(201, json!({"id": 7})).unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 7);
    }

    #[test]
    fn test_unknown_status_replays_as_ok() {
        let (status, _) = replay_from(-3, json!({})).unwrap();
        assert_eq!(status, StatusCode::OK);
    }
}
