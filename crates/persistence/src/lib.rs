//! Persistence layer for the Course Report backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Schema migrations (src/migrations)

pub mod db;
pub mod entities;
pub mod repositories;
