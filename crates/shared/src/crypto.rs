//! Cryptographic utilities for API token generation and hashing.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix carried by every raw API token.
pub const TOKEN_PREFIX: &str = "crt_";

/// Number of random characters in a generated token after the prefix.
const TOKEN_RANDOM_LEN: usize = 32;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new raw API token (`crt_` + 32 alphanumeric characters).
///
/// The raw value is returned to the caller exactly once; only its
/// SHA-256 hash is persisted.
pub fn generate_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", TOKEN_PREFIX, random)
}

/// Extracts the identifying prefix from a raw token (first 8 characters
/// after "crt_"). Returns `None` when the token is malformed.
pub fn extract_token_prefix(token: &str) -> Option<&str> {
    if token.starts_with(TOKEN_PREFIX) && token.len() >= TOKEN_PREFIX.len() + 8 {
        Some(&token[TOKEN_PREFIX.len()..TOKEN_PREFIX.len() + 8])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + 32);
        assert!(token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_token_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_extract_token_prefix() {
        assert_eq!(extract_token_prefix("crt_abcdefgh12345"), Some("abcdefgh"));
        assert_eq!(extract_token_prefix("crt_short"), None);
        assert_eq!(extract_token_prefix("invalid_token"), None);
    }

    #[test]
    fn test_extract_token_prefix_exact_length() {
        assert_eq!(extract_token_prefix("crt_12345678"), Some("12345678"));
    }

    #[test]
    fn test_extract_token_prefix_wrong_prefix() {
        assert_eq!(extract_token_prefix("pm_abcdefgh12345"), None);
        assert_eq!(extract_token_prefix("CRT_abcdefgh12345"), None);
    }

    #[test]
    fn test_extract_token_prefix_empty() {
        assert_eq!(extract_token_prefix(""), None);
    }

    #[test]
    fn test_generated_token_roundtrip() {
        let token = generate_token();
        let prefix = extract_token_prefix(&token).unwrap();
        assert_eq!(prefix, &token[4..12]);
    }
}
