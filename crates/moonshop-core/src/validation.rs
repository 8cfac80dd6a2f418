//! # Validation Module
//!
//! Input validation for values that flow into cart tokens.
//!
//! ## Why Validate Before Encoding?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The token payload is a plain text grammar:                            │
//! │                                                                         │
//! │      S00111:2,Gorra_default_default:1|29213856                         │
//! │              ▲                        ▲                                 │
//! │        item separator ","      timestamp separator "|"                 │
//! │                                                                         │
//! │  A variant id containing "," or "|" would split into garbage on the    │
//! │  way back, so such values are refused up front instead.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_ITEM_QUANTITY;

/// Characters that delimit the token payload grammar.
pub const RESERVED_SEPARATORS: [char; 2] = [',', '|'];

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
///
/// ## Example
/// ```rust
/// use moonshop_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a value that is written verbatim into a token payload.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain `,` or `|`
/// - Must not contain control characters (a leading NUL would not survive
///   the byte-to-integer step)
pub fn validate_payload_segment(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Some(sep) = value.chars().find(|c| RESERVED_SEPARATORS.contains(c)) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must not contain '{sep}'"),
        });
    }

    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Checks that a product id has the compact record shape: one ASCII
/// uppercase letter followed by at least three ASCII digits.
///
/// ## Example
/// ```rust
/// use moonshop_core::validation::is_compact_product_id;
///
/// assert!(is_compact_product_id("S001"));
/// assert!(is_compact_product_id("T0042"));
/// assert!(!is_compact_product_id("S01"));
/// assert!(!is_compact_product_id("remera"));
/// ```
pub fn is_compact_product_id(id: &str) -> bool {
    let mut bytes = id.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    let digits = bytes.len();
    digits >= 3 && id.bytes().skip(1).all(|b| b.is_ascii_digit())
}

/// Validates a product price.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_payload_segment() {
        assert!(validate_payload_segment("id", "Remera_Blanco_L").is_ok());
        assert!(validate_payload_segment("id", "Taza: 350ml").is_ok());

        let err = validate_payload_segment("id", "Remera,Buzo").unwrap_err();
        assert_eq!(err.to_string(), "id has invalid format: must not contain ','");
        assert!(validate_payload_segment("id", "a|b").is_err());
        assert!(matches!(
            validate_payload_segment("id", ""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_payload_segment_rejects_control_characters() {
        let err = validate_payload_segment("id", "\0Buzo_x_y").unwrap_err();
        assert_eq!(
            err.to_string(),
            "id has invalid format: must not contain control characters"
        );
        assert!(validate_payload_segment("id", "Buzo_x_y\t").is_err());
        assert!(validate_payload_segment("id", "Buzo_Ñandú_L").is_ok());
    }

    #[test]
    fn test_compact_product_id_shape() {
        assert!(is_compact_product_id("S001"));
        assert!(is_compact_product_id("Z123456"));
        assert!(!is_compact_product_id(""));
        assert!(!is_compact_product_id("s001"));
        assert!(!is_compact_product_id("SA001"));
        assert!(!is_compact_product_id("S00a"));
        assert!(!is_compact_product_id("Ñ001"));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(15000).is_ok());
        assert!(validate_price(-1).is_err());
    }
}
