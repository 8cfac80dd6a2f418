//! # Inventory Error Types
//!
//! Error types for catalog loading and shop configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Catalog        │  │  Configuration  │  │     Core                │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Unavailable    │  │  InvalidConfig  │  │  Token / Cart errors    │ │
//! │  │  InvalidCatalog │  │  InvalidUrl     │  │  passed through         │ │
//! │  │                 │  │  LoadFailed     │  │                         │ │
//! │  │                 │  │  SaveFailed     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use moonshop_core::CoreError;
use thiserror::Error;

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Everything that can go wrong between the filesystem and the codec.
#[derive(Debug, Error)]
pub enum InventoryError {
    // =========================================================================
    // Catalog Errors
    // =========================================================================
    /// The inventory file could not be read.
    ///
    /// The store keeps serving its previous index when this happens.
    #[error("Catalog unavailable at {path}: {reason}")]
    CatalogUnavailable { path: PathBuf, reason: String },

    /// The inventory file was read but is not a valid catalog.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid shop configuration.
    #[error("Invalid shop configuration: {0}")]
    InvalidConfig(String),

    /// Invalid share base URL.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::InvalidCatalog(err.to_string())
    }
}

impl From<url::ParseError> for InventoryError {
    fn from(err: url::ParseError) -> Self {
        InventoryError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for InventoryError {
    fn from(err: toml::de::Error) -> Self {
        InventoryError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for InventoryError {
    fn from(err: toml::ser::Error) -> Self {
        InventoryError::ConfigSaveFailed(err.to_string())
    }
}

impl From<moonshop_core::TokenError> for InventoryError {
    fn from(err: moonshop_core::TokenError) -> Self {
        InventoryError::Core(err.into())
    }
}

impl From<moonshop_core::CartError> for InventoryError {
    fn from(err: moonshop_core::CartError) -> Self {
        InventoryError::Core(err.into())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl InventoryError {
    /// Returns true if the catalog source failed; the previous index is
    /// still usable.
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            InventoryError::CatalogUnavailable { .. } | InventoryError::InvalidCatalog(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            InventoryError::InvalidConfig(_)
                | InventoryError::InvalidUrl(_)
                | InventoryError::ConfigLoadFailed(_)
                | InventoryError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = InventoryError::CatalogUnavailable {
            path: PathBuf::from("src/inventory.json"),
            reason: "No such file".into(),
        };
        assert!(err.is_catalog_error());
        assert!(!err.is_config_error());
        assert_eq!(
            err.to_string(),
            "Catalog unavailable at src/inventory.json: No such file"
        );

        assert!(InventoryError::InvalidConfig("x".into()).is_config_error());
        assert!(!InventoryError::InvalidConfig("x".into()).is_catalog_error());
    }

    #[test]
    fn test_json_error_is_invalid_catalog() {
        let err: InventoryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, InventoryError::InvalidCatalog(_)));
    }

    #[test]
    fn test_token_error_passes_through() {
        let err: InventoryError = moonshop_core::TokenError::Integrity.into();
        assert_eq!(err.to_string(), "Token integrity check failed");
    }
}
