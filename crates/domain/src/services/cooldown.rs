//! Alert cooldown policy.
//!
//! A new alert of the same (company, type) is suppressed while an
//! unresolved alert exists within the cooldown window, so a flapping sync
//! does not flood the alert log.

use chrono::{DateTime, Duration, Utc};

/// Cooldown window policy for duplicate-alert suppression.
#[derive(Debug, Clone, Copy)]
pub struct CooldownPolicy {
    window: Duration,
}

impl CooldownPolicy {
    /// Creates a policy with the given window in minutes.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            window: Duration::minutes(minutes),
        }
    }

    /// Whether a new alert should be suppressed given the newest matching
    /// unresolved alert, evaluated at `now`.
    pub fn suppresses(&self, last_unresolved_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_unresolved_at {
            Some(created_at) => now - created_at < self.window,
            None => false,
        }
    }

    /// The configured window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
