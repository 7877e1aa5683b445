//! Domain model definitions.

pub mod alert;
pub mod api_log;
pub mod api_token;
pub mod cache;
pub mod company;
pub mod report;
pub mod settings;
pub mod sync;

pub use alert::{Alert, AlertSeverity, ListAlertsQuery, RaiseAlertInput};
pub use api_log::{ApiCallLog, ListLogsQuery, LogPagination, ListLogsResponse, RecordApiCallInput};
pub use api_token::{ApiToken, IssueTokenRequest, IssuedTokenResponse};
pub use cache::build_cache_key;
pub use company::{Company, CreateCompanyRequest};
pub use report::{
    CompletionRecord, CompletionStatus, ExportFormat, ReportPage, ReportQuery,
};
pub use settings::{
    validate_setting, ReportSettings, SettingError, SettingsResponse, SyncMode,
    UpdateSettingsRequest, REPORT_FIELDS,
};
pub use sync::{SyncError, SyncOutcome, SyncRequest, SyncRunSummary};
