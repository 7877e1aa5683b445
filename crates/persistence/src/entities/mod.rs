//! Database entity definitions (row mappings).

pub mod alert;
pub mod api_call_log;
pub mod api_token;
pub mod cache_entry;
pub mod company;
pub mod company_setting;
pub mod idempotency_key;
pub mod live;
pub mod reporting_record;
pub mod sync_state;

pub use alert::AlertEntity;
pub use api_call_log::ApiCallLogEntity;
pub use api_token::ApiTokenEntity;
pub use cache_entry::CacheEntryEntity;
pub use company::CompanyEntity;
pub use company_setting::CompanySettingEntity;
pub use idempotency_key::IdempotencyKeyEntity;
pub use live::LiveCompletionRow;
pub use reporting_record::ReportingRecordEntity;
pub use sync_state::SyncStateEntity;
