//! Alert raising with cooldown suppression.

use domain::models::{Alert, RaiseAlertInput};
use domain::services::CooldownPolicy;
use persistence::repositories::AlertRepository;
use sqlx::PgPool;

/// Raises alerts, suppressing duplicates of the same type while a fresh
/// unresolved alert exists for the company.
#[derive(Clone)]
pub struct AlertService {
    repo: AlertRepository,
    policy: CooldownPolicy,
}

impl AlertService {
    pub fn new(pool: PgPool, cooldown_minutes: i64) -> Self {
        Self {
            repo: AlertRepository::new(pool),
            policy: CooldownPolicy::from_minutes(cooldown_minutes),
        }
    }

    /// Raise an alert unless the cooldown suppresses it.
    ///
    /// Returns `Ok(None)` when a fresh unresolved alert of the same type
    /// already exists for the company.
    pub async fn raise(&self, input: RaiseAlertInput) -> Result<Option<Alert>, sqlx::Error> {
        let last = self
            .repo
            .latest_unresolved_at(input.company_id, &input.alert_type)
            .await?;

        if self.policy.suppresses(last, chrono::Utc::now()) {
            tracing::debug!(
                alert_type = %input.alert_type,
                company_id = ?input.company_id,
                "Alert suppressed by cooldown"
            );
            return Ok(None);
        }

        let alert = self.repo.insert(&input).await?;
        tracing::warn!(
            alert_id = alert.id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            company_id = ?alert.company_id,
            "Alert raised"
        );
        Ok(Some(alert))
    }

    /// Raise an alert in the background (fire and forget).
    ///
    /// For paths where alerting must not delay or fail the caller.
    pub fn raise_async(&self, input: RaiseAlertInput) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.raise(input).await {
                tracing::error!(error = %e, "Failed to raise alert");
            }
        });
    }
}
