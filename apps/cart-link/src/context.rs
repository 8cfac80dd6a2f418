//! # Command Context
//!
//! Everything a subcommand needs, loaded once before it runs.
//!
//! ## Startup Sequence
//! 1. Load shop.toml (explicit `--config`, else the platform config dir)
//! 2. Apply `--catalog` over the configured inventory path
//! 3. Open the `CatalogStore` (first inventory load)

use std::path::PathBuf;
use std::sync::Arc;

use moonshop_core::CartTokenCodec;
use moonshop_inventory::{CatalogStore, ShopConfig};
use tracing::{debug, info};

use crate::error::CliResult;

/// Loaded configuration plus the catalog-backed codec.
pub struct AppContext {
    pub config: ShopConfig,
    pub store: CatalogStore,
}

impl AppContext {
    /// Loads configuration and the inventory.
    ///
    /// An explicit `--config` file must load cleanly. Without one, a broken
    /// default config falls back to defaults with a warning.
    pub async fn load(config_path: Option<&str>, catalog_path: Option<&str>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => ShopConfig::load(Some(PathBuf::from(path)))?,
            None => ShopConfig::load_or_default(None),
        };

        if let Some(path) = catalog_path {
            debug!(path, "Catalog path overridden on the command line");
            config.catalog.path = PathBuf::from(path);
        }

        let store = CatalogStore::open(config.catalog_path(), config.codec_config()).await?;
        info!(path = ?store.path(), "Catalog ready");

        Ok(AppContext { config, store })
    }

    /// Codec over the current catalog.
    pub async fn codec(&self) -> Arc<CartTokenCodec> {
        self.store.codec().await
    }
}
