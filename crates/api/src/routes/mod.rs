//! HTTP route handlers.

pub mod alerts;
pub mod companies;
pub mod health;
pub mod logs;
pub mod report;
pub mod settings;
pub mod sync;
