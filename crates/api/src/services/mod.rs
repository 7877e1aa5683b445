//! Application services coordinating repositories and domain logic.

pub mod alerts;
pub mod idempotency;
pub mod report;
pub mod settings;
pub mod sync;

pub use alerts::AlertService;
pub use idempotency::{IdempotencyOutcome, IdempotencyService};
pub use report::ReportService;
pub use settings::{SettingsService, SettingsServiceError};
pub use sync::{SyncService, SyncServiceError};
