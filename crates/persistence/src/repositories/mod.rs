//! Repository implementations for database operations.

pub mod alert;
pub mod api_call_log;
pub mod api_token;
pub mod cache_entry;
pub mod company;
pub mod company_setting;
pub mod idempotency_key;
pub mod reporting_record;
pub mod sync_state;

pub use alert::AlertRepository;
pub use api_call_log::ApiCallLogRepository;
pub use api_token::ApiTokenRepository;
pub use cache_entry::CacheRepository;
pub use company::CompanyRepository;
pub use company_setting::CompanySettingRepository;
pub use idempotency_key::IdempotencyKeyRepository;
pub use reporting_record::ReportingRecordRepository;
pub use sync_state::SyncStateRepository;
