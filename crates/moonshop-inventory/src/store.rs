//! # Catalog Store
//!
//! Holds the codec for the current catalog snapshot and swaps it on reload.
//!
//! ## Reload Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CatalogStore::reload()                             │
//! │                                                                         │
//! │   read inventory.json ──► parse ──► CatalogIndex::build                 │
//! │          │                                 │                            │
//! │          │ failure                         │ success                    │
//! │          ▼                                 ▼                            │
//! │   keep previous codec              write lock, swap Arc                 │
//! │   (possibly the empty one)         readers holding the old Arc          │
//! │                                    finish with the old snapshot         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index is never edited in place. A codec handed out by [`CatalogStore::codec`]
//! stays consistent for as long as the caller keeps it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use moonshop_core::{CartTokenCodec, Catalog, CatalogIndex, CodecConfig};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::InventoryResult;
use crate::loader::load_catalog;

/// Swappable codec over the shop's inventory file.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    config: CodecConfig,
    codec: RwLock<Arc<CartTokenCodec>>,
}

impl CatalogStore {
    /// Creates a store that resolves nothing until the first reload.
    pub fn new(path: impl Into<PathBuf>, config: CodecConfig) -> Self {
        let codec = CartTokenCodec::new(CatalogIndex::empty(), config.clone());
        CatalogStore {
            path: path.into(),
            config,
            codec: RwLock::new(Arc::new(codec)),
        }
    }

    /// Creates the store and performs the first load.
    pub async fn open(path: impl Into<PathBuf>, config: CodecConfig) -> InventoryResult<Self> {
        let store = Self::new(path, config);
        store.reload().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the inventory and swaps in a fresh index.
    ///
    /// On failure the previous index stays in service and the error is
    /// returned.
    pub async fn reload(&self) -> InventoryResult<()> {
        let catalog = match load_catalog(&self.path).await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "Catalog reload failed; keeping previous index");
                return Err(err);
            }
        };
        self.replace_catalog(catalog).await;
        Ok(())
    }

    /// Swaps in an index built from `catalog`.
    pub async fn replace_catalog(&self, catalog: Catalog) {
        let codec = CartTokenCodec::with_catalog(catalog, self.config.clone());
        let products = codec.index().len();

        let mut guard = self.codec.write().await;
        *guard = Arc::new(codec);
        info!(products, "Catalog index swapped");
    }

    /// Current codec snapshot.
    pub async fn codec(&self) -> Arc<CartTokenCodec> {
        Arc::clone(&*self.codec.read().await)
    }

    /// Current catalog snapshot.
    pub async fn catalog(&self) -> Catalog {
        self.codec().await.index().catalog().clone()
    }
}
