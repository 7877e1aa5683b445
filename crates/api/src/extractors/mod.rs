//! Request extractors.

pub mod api_token;
pub mod idempotency_key;

pub use api_token::TokenAuth;
pub use idempotency_key::{IdempotencyKey, OptionalIdempotencyKey};
