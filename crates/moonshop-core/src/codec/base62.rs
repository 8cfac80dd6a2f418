//! Big-integer / base-62 engine.
//!
//! The payload bytes are read as one big-endian unsigned integer, which is
//! then written out in base 62. No escaping is needed because the 62-symbol
//! alphabet is URL-safe as is.

use num_bigint::BigUint;

use crate::error::{TokenError, TokenResult};

/// Digit alphabet: `0-9`, then `a-z`, then `A-Z`. Case-sensitive.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u32 = 62;

/// Big-endian accumulation: `n = n * 256 + byte` for each byte.
///
/// Leading zero bytes do not survive the trip back.
pub fn bytes_to_integer(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Inverse of [`bytes_to_integer`]. Zero yields no bytes at all.
pub fn integer_to_bytes(n: &BigUint) -> Vec<u8> {
    if n.bits() == 0 {
        return Vec::new();
    }
    n.to_bytes_be()
}

/// Most significant digit first; zero is `"0"`. Output width varies.
pub fn integer_to_base62(n: &BigUint) -> String {
    n.to_radix_be(BASE)
        .into_iter()
        .map(|digit| ALPHABET[usize::from(digit)] as char)
        .collect()
}

/// Inverse of [`integer_to_base62`].
///
/// Every character must belong to [`ALPHABET`]; the first one that does not
/// is reported with its byte position.
pub fn base62_to_integer(s: &str) -> TokenResult<BigUint> {
    if s.is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    let digits = s
        .char_indices()
        .map(|(position, found)| digit_value(found).ok_or(TokenError::InvalidDigit { position, found }))
        .collect::<TokenResult<Vec<u8>>>()?;

    // Every digit is < 62, so the conversion cannot fail.
    BigUint::from_radix_be(&digits, BASE).ok_or(TokenError::EmptyPayload)
}

/// Value of one alphabet symbol.
pub fn digit_value(c: char) -> Option<u8> {
    let b = u8::try_from(c).ok()?;
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'z' => Some(b - b'a' + 10),
        b'A'..=b'Z' => Some(b - b'A' + 36),
        _ => None,
    }
}
