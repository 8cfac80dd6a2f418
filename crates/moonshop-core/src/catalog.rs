//! # Catalog Index
//!
//! Lookup tables the cart token codec needs to turn a variant into a few
//! characters and back.
//!
//! ## Index Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog                                                                │
//! │    "remera" → { id: "S001", name: "Remera",                            │
//! │                 colors: [Negro, Blanco], sizes: [M, L] }               │
//! │                         │                                               │
//! │                         ▼  CatalogIndex::build                          │
//! │  products        "S001" → Product                                      │
//! │  color_positions "S001" → { Negro: 0, Blanco: 1 }                      │
//! │  size_positions  "S001" → { M: 0, L: 1 }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Position Invariant
//! Position N is always the N-th declared color or size. Positions travel
//! inside tokens as single digits, so they are only stable for as long as
//! the catalog keeps its declaration order.
//!
//! Size positions come from the product-level size list. A color's
//! restricted `available_sizes` only filters what the storefront offers.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Catalog, Product};

/// Derived, read-only lookup tables over one catalog snapshot.
///
/// Rebuilt wholesale whenever the catalog is reloaded; never edited in place.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    catalog: Catalog,
    products: HashMap<String, Product>,
    color_positions: HashMap<String, HashMap<String, usize>>,
    size_positions: HashMap<String, HashMap<String, usize>>,
}

impl CatalogIndex {
    /// An index that resolves nothing. Every item falls back to the
    /// verbose record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the index from a catalog snapshot.
    ///
    /// ## Identifier Assignment
    /// - `product.id` when present and non-empty
    /// - otherwise the key of the first catalog entry carrying the same
    ///   name, which is deterministic for a given catalog content
    pub fn build(catalog: Catalog) -> Self {
        let mut products = HashMap::with_capacity(catalog.len());
        let mut color_positions = HashMap::with_capacity(catalog.len());
        let mut size_positions = HashMap::with_capacity(catalog.len());

        for (_, product) in catalog.iter() {
            let Some(product_id) = assigned_id(&catalog, product) else {
                continue;
            };

            color_positions.insert(
                product_id.clone(),
                positions(product.colors.iter().map(|c| c.name.as_str())),
            );
            size_positions.insert(
                product_id.clone(),
                positions(product.sizes.iter().map(String::as_str)),
            );
            products.insert(product_id, product.clone());
        }

        debug!(products = products.len(), "Catalog index built");

        CatalogIndex {
            catalog,
            products,
            color_positions,
            size_positions,
        }
    }

    /// The catalog snapshot this index was built from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of products the index resolves.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Finds a product by identifier, falling back to a scan of the raw
    /// catalog by explicit `id` field.
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products
            .get(product_id)
            .or_else(|| self.catalog.find_by_id(product_id))
    }

    /// Zero-based position of a color within the product's color list.
    pub fn color_position(&self, product_id: &str, color: &str) -> Option<usize> {
        self.color_positions.get(product_id)?.get(color).copied()
    }

    /// Zero-based position of a size within the product's size list.
    pub fn size_position(&self, product_id: &str, size: &str) -> Option<usize> {
        self.size_positions.get(product_id)?.get(size).copied()
    }

    /// Resolves the product a variant id belongs to.
    ///
    /// The first catalog entry (in catalog order) whose name equals the
    /// variant id, or is followed by `_` at its start, wins.
    ///
    /// ## Returns
    /// `(product_id, product)` where the id is the product's explicit id
    /// or, failing that, its catalog key.
    pub fn resolve_variant(&self, variant_id: &str) -> Option<(&str, &Product)> {
        self.catalog.iter().find_map(|(key, product)| {
            let rest = variant_id.strip_prefix(product.name.as_str())?;
            if rest.is_empty() || rest.starts_with('_') {
                let id = product.id.as_deref().filter(|id| !id.is_empty()).unwrap_or(key);
                Some((id, product))
            } else {
                None
            }
        })
    }
}

fn assigned_id(catalog: &Catalog, product: &Product) -> Option<String> {
    match product.id.as_deref() {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => catalog.key_for_name(&product.name).map(str::to_owned),
    }
}

/// First declaration wins when a name repeats.
fn positions<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (position, name) in names.enumerate() {
        map.entry(name.to_string()).or_insert(position);
    }
    map
}

// =============================================================================
// Unit Tests
// =============================================================================
