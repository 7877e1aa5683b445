//! Shared utilities for the Course Report backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (API token generation and hashing)
//! - Cursor-based pagination helpers

pub mod crypto;
pub mod pagination;
