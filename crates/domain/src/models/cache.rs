//! Response-cache key construction.
//!
//! Cache keys are SHA-256 over the company id, the endpoint, and the
//! canonicalized (sorted) query parameters, so equivalent requests hash to
//! the same key regardless of parameter order.

use uuid::Uuid;

use shared::crypto::sha256_hex;

/// Builds the cache key for a request shape.
pub fn build_cache_key(company_id: Uuid, endpoint: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut raw = format!("{}|{}", company_id, endpoint);
    for (name, value) in sorted {
        raw.push('|');
        raw.push_str(name);
        raw.push('=');
        raw.push_str(value);
    }

    sha256_hex(&raw)
}
