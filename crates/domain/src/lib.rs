//! Domain models and pure business logic for the Course Report backend.
//!
//! This crate contains:
//! - Domain models shared between the API and persistence layers
//! - Request/response types for the HTTP surface
//! - Pure policy logic (alert cooldown, CSV rendering)

pub mod models;
pub mod services;
