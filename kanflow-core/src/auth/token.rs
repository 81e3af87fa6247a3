/// Opaque bearer token utilities
///
/// Authentication tokens are random, unguessable strings handed out at
/// registration and login. Only the SHA-256 digest is stored; the plaintext
/// is returned to the client once and cannot be recovered from the store.
///
/// # Token Format
///
/// `kan_{32_chars}` (37 chars total)
/// - Prefix: "kan_" (4 chars)
/// - Random part: 32 base62 chars ([A-Za-z0-9]), 62^32 ≈ 2^190 combinations
///
/// # Example
///
/// ```
/// use kanflow_core::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (token, hash) = generate_token();
/// assert!(token.starts_with("kan_"));
/// assert!(validate_token_format(&token));
/// assert_eq!(hash, hash_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Token prefix
const TOKEN_PREFIX: &str = "kan_";

/// Total length of a bearer token (prefix + random)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new bearer token
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hash). Store the hash, return the
/// plaintext to the client.
pub fn generate_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random base62 string using the OS-seeded thread RNG
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a token using SHA-256
///
/// # Returns
///
/// Hex-encoded SHA-256 digest (64 characters). Deterministic, so lookups
/// hash the presented token and match on the digest column.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates token format without touching the database
///
/// Checks prefix, length, and that the random part is alphanumeric. Used to
/// reject malformed tokens before any storage lookup.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    let Some(random_part) = token.strip_prefix(TOKEN_PREFIX) else {
        return false;
    };

    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let (token, hash) = generate_token();

        assert!(token.starts_with("kan_"));
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(hash.len(), 64);
        assert!(validate_token_format(&token));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_deterministic() {
        assert_eq!(hash_token("kan_test123"), hash_token("kan_test123"));
        assert_ne!(hash_token("kan_test123"), hash_token("kan_test124"));
    }

    #[test]
    fn test_validate_token_format_rejects_bad_input() {
        assert!(!validate_token_format(""));
        assert!(!validate_token_format("kan_short"));
        assert!(!validate_token_format("bad_abcdefghijklmnopqrstuvwxyz123456"));
        assert!(!validate_token_format("kan_abcdefghijklmnopqrstuvwxy!123456"));
    }
}
