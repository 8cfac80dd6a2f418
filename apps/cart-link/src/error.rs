//! # CLI Error Type
//!
//! Unified error type for `cart-link` subcommands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in cart-link                              │
//! │                                                                         │
//! │  Subcommand ── Result<(), CliError>                                     │
//! │       │                                                                 │
//! │       ├── InventoryError (catalog file, shop.toml) ──┐                  │
//! │       ├── TokenError (format, integrity, payload) ───┤                  │
//! │       ├── CartError (restore, limits) ───────────────┼──► CliError      │
//! │       └── io / JSON (cart file) ─────────────────────┘        │         │
//! │                                                               ▼         │
//! │                               main: "error[INTEGRITY]: ..." , exit 1    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use moonshop_core::{CartError, CoreError, TokenError};
use moonshop_inventory::InventoryError;

/// Error returned from a subcommand.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes printed alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Token is not `<payload>-<digest>`
    TokenFormat,

    /// Digest did not verify
    Integrity,

    /// Payload could not be decoded
    Decompression,

    /// Cart could not be built or restored
    CartError,

    /// Inventory file missing or invalid
    CatalogError,

    /// shop.toml or overrides invalid
    ConfigError,

    /// Bad command input (cart file, URL)
    ValidationError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TokenFormat => "TOKEN_FORMAT",
            ErrorCode::Integrity => "INTEGRITY",
            ErrorCode::Decompression => "DECOMPRESSION",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::CatalogError => "CATALOG_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::CartError, message)
    }
}

/// Result alias for subcommands.
pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<TokenError> for CliError {
    fn from(err: TokenError) -> Self {
        let code = if err.is_format_error() {
            ErrorCode::TokenFormat
        } else if err.is_integrity_error() {
            ErrorCode::Integrity
        } else if err.is_decompression_error() || matches!(err, TokenError::MalformedPayload(_)) {
            ErrorCode::Decompression
        } else {
            ErrorCode::ValidationError
        };
        CliError::new(code, err.to_string())
    }
}

impl From<CartError> for CliError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Token(e) => e.into(),
            other => CliError::cart(other.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Token(e) => e.into(),
            CoreError::Cart(e) => e.into(),
            CoreError::Validation(e) => CliError::validation(e.to_string()),
            CoreError::InvalidUrl(e) => CliError::validation(format!("Invalid URL: {e}")),
        }
    }
}

impl From<InventoryError> for CliError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Core(core) => core.into(),
            err if err.is_catalog_error() => CliError::new(ErrorCode::CatalogError, err.to_string()),
            err if err.is_config_error() => CliError::new(ErrorCode::ConfigError, err.to_string()),
            err => {
                tracing::error!("Inventory error: {}", err);
                CliError::new(ErrorCode::Internal, err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::validation(format!("Cannot read input: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CliError::new(ErrorCode::Internal, err.to_string())
        } else {
            CliError::validation(format!("Invalid cart JSON: {err}"))
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}
