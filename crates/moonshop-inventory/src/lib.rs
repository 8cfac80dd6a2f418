//! # moonshop-inventory: Catalog Loading for MoonShop
//!
//! Loads the storefront inventory, keeps a swappable cart token codec over
//! it, and reads the shop configuration.
//!
//! ## Module Organization
//! - [`config`] - Shop configuration (catalog path, token, share links)
//! - [`error`] - Inventory error types
//! - [`loader`] - Async inventory file loading
//! - [`query`] - Search, category listing, filters and facets
//! - [`store`] - `CatalogStore`: current codec behind a lock, hot reload
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moonshop_inventory::{CatalogStore, ShopConfig};
//!
//! let config = ShopConfig::load_or_default(None);
//! let store = CatalogStore::open(config.catalog_path(), config.codec_config()).await?;
//!
//! let codec = store.codec().await;
//! let token = codec.encode(&items)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod loader;
pub mod query;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ShopConfig;
pub use error::{InventoryError, InventoryResult};
pub use loader::{load_catalog, parse_catalog};
pub use query::{facets, products_by_type, search, Facets, ProductFilter};
pub use store::CatalogStore;
