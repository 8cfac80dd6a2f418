//! # Error Types
//!
//! Domain-specific error types for moonshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  moonshop-core errors (this file)                                      │
//! │  ├── TokenError       - Cart token encode/decode failures              │
//! │  ├── CartError        - Cart mutation and restore failures             │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CoreError        - Umbrella for callers that mix the above        │
//! │                                                                         │
//! │  moonshop-inventory errors (separate crate)                            │
//! │  └── InventoryError   - Catalog loading and config failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → CoreError → CLI / storefront      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Failure Taxonomy
//! | Category      | Variants                                          |
//! |---------------|---------------------------------------------------|
//! | Format        | `Format`, `EmptyDigest`                           |
//! | Integrity     | `Integrity`                                       |
//! | Decompression | `InvalidDigit`, `EmptyPayload`, `InvalidUtf8`     |
//! | Payload       | `MalformedPayload`                                |
//! | Encode        | `Unencodable`                                     |
//!
//! A record that falls back to the verbose item grammar is NOT an error.

use thiserror::Error;

// =============================================================================
// Token Error
// =============================================================================

/// Failures while building or reading a cart token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token does not split into exactly `<payload>-<digest>`.
    #[error("Invalid token format: expected <payload>-<digest>, found {parts} part(s)")]
    Format { parts: usize },

    /// Token ends with a dash and carries no digest at all.
    #[error("Invalid token format: digest segment is empty")]
    EmptyDigest,

    /// Received digest is not a prefix of the recomputed digest.
    ///
    /// ## When This Occurs
    /// - A character of the payload or digest was edited
    /// - The token was minted with a different secret (e.g. last year's)
    #[error("Token integrity check failed")]
    Integrity,

    /// Payload segment contains a character outside the base-62 alphabet.
    #[error("Invalid base-62 digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },

    /// Payload decodes to zero bytes.
    #[error("Token payload is empty")]
    EmptyPayload,

    /// Payload bytes are not UTF-8.
    #[error("Token payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Decompressed payload lacks the `|<minutes>` trailer.
    #[error("Malformed token payload: {0}")]
    MalformedPayload(String),

    /// A cart value would break the payload grammar.
    #[error("Cannot encode {field} '{value}': {reason}")]
    Unencodable {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl TokenError {
    /// Returns true if the token shape itself is wrong.
    pub fn is_format_error(&self) -> bool {
        matches!(self, TokenError::Format { .. } | TokenError::EmptyDigest)
    }

    /// Returns true if the digest did not verify.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, TokenError::Integrity)
    }

    /// Returns true if the payload could not be turned back into text.
    pub fn is_decompression_error(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidDigit { .. } | TokenError::EmptyPayload | TokenError::InvalidUtf8(_)
        )
    }
}

/// Convenience type alias for Results with TokenError.
pub type TokenResult<T> = Result<T, TokenError>;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart mutation and restore errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Variant is not in the cart.
    #[error("Item {0} not in cart")]
    ItemNotInCart(String),

    /// A decoded token line could not be turned into a cart line.
    ///
    /// ## User Workflow
    /// ```text
    /// Visit ?cart=<token>
    ///      │
    ///      ▼
    /// Decode OK, line 2 references a product no longer in the catalog
    ///      │
    ///      ▼
    /// Restore { index: 2, .. }  → live cart left untouched
    /// ```
    #[error("Cannot restore cart line {index}: {reason}")]
    Restore { index: usize, reason: String },

    /// The token itself failed to decode.
    #[error("Cart token error: {0}")]
    Token(#[from] TokenError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before the codec or cart runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., reserved separator inside a name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that drive several core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Share or checkout URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for CoreError {
    fn from(err: url::ParseError) -> Self {
        CoreError::InvalidUrl(err.to_string())
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
