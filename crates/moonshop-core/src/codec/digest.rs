//! Token integrity digest.
//!
//! `SHA-256(compressed ++ secret)`, rendered in base 62 and truncated.
//!
//! The secret ships inside the storefront bundle and only rotates with the
//! calendar year. It stops casual edits to a shared link; it is not a
//! cryptographic signature.

use sha2::{Digest, Sha256};

use super::base62::{bytes_to_integer, integer_to_base62};

/// Prefix of the year-seeded shared secret.
pub const SECRET_PREFIX: &str = "MOONSHOP_SECRET_";

/// Shared secret for a given year, e.g. `MOONSHOP_SECRET_2026`.
pub fn year_secret(year: i32) -> String {
    format!("{SECRET_PREFIX}{year}")
}

/// Full base-62 digest of a compressed payload segment.
pub fn full_digest(compressed: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(compressed.as_bytes());
    hasher.update(secret.as_bytes());
    integer_to_base62(&bytes_to_integer(&hasher.finalize()))
}

/// The first `len` characters of [`full_digest`].
pub fn truncated_digest(compressed: &str, secret: &str, len: usize) -> String {
    let mut digest = full_digest(compressed, secret);
    digest.truncate(len);
    digest
}

/// Prefix acceptance rule: the received digest passes when the recomputed
/// digest starts with it. An empty received digest never passes.
pub fn verify(compressed: &str, received: &str, secret: &str) -> bool {
    !received.is_empty() && full_digest(compressed, secret).starts_with(received)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "MOONSHOP_SECRET_2026";

    #[test]
    fn test_year_secret() {
        assert_eq!(year_secret(2026), SECRET);
    }

    #[test]
    fn test_digest_is_deterministic_and_secret_bound() {
        let a = full_digest("abc123", SECRET);
        assert_eq!(a, full_digest("abc123", SECRET));
        assert_ne!(a, full_digest("abc123", "MOONSHOP_SECRET_2025"));
        assert_ne!(a, full_digest("abc124", SECRET));
        // 256-bit value in base 62 is at most 43 symbols
        assert!(a.len() <= 43 && a.len() >= 40);
    }

    #[test]
    fn test_truncated_digest_is_prefix() {
        let full = full_digest("payload", SECRET);
        let short = truncated_digest("payload", SECRET, 8);
        assert_eq!(short.len(), 8);
        assert!(full.starts_with(&short));
    }

    #[test]
    fn test_verify_accepts_any_non_empty_prefix() {
        let full = full_digest("payload", SECRET);
        assert!(verify("payload", &full[..8], SECRET));
        assert!(verify("payload", &full[..1], SECRET));
        assert!(verify("payload", &full, SECRET));
        assert!(!verify("payload", "", SECRET));
        assert!(!verify("payload", &format!("{full}0"), SECRET));
    }
}
