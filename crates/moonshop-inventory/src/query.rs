//! # Catalog Queries
//!
//! Search and filtering behind the storefront listing.
//!
//! ## Listing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog ──► search("remera") ──► ProductFilter::apply ──► listing      │
//! │               name, type, tags     types, tags, sizes,                  │
//! │               case-insensitive     colors, price range                  │
//! │                                                                         │
//! │  facets(catalog) feeds the filter dropdowns                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query keeps catalog order and returns `(key, product)` pairs.

use moonshop_core::{Catalog, Product};
use serde::{Deserialize, Serialize};

/// `(catalog key, product)` in catalog order.
pub type Listing<'a> = Vec<(&'a str, &'a Product)>;

/// Products whose name, type or tags contain `term`, ignoring case.
/// An empty term matches everything.
pub fn search<'a>(catalog: &'a Catalog, term: &str) -> Listing<'a> {
    let term = term.trim().to_lowercase();
    catalog
        .iter()
        .filter(|(_, product)| term.is_empty() || searchable_text(product).contains(&term))
        .collect()
}

fn searchable_text(product: &Product) -> String {
    let mut text = product.name.to_lowercase();
    if let Some(kind) = &product.kind {
        text.push(' ');
        text.push_str(&kind.to_lowercase());
    }
    for tag in &product.tags {
        text.push(' ');
        text.push_str(&tag.to_lowercase());
    }
    text
}

/// Products of one category.
pub fn products_by_type<'a>(catalog: &'a Catalog, kind: &str) -> Listing<'a> {
    catalog
        .iter()
        .filter(|(_, product)| product.kind.as_deref() == Some(kind))
        .collect()
}

// =============================================================================
// Product Filter
// =============================================================================

/// Active listing filters.
///
/// An empty list does not filter. A non-empty list passes a product that
/// matches ANY of its values; all criteria must pass together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<i64>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<i64>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        *self == ProductFilter::default()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let type_ok = self.types.is_empty()
            || product
                .kind
                .as_ref()
                .is_some_and(|kind| self.types.contains(kind));
        let tags_ok = self.tags.is_empty() || product.tags.iter().any(|t| self.tags.contains(t));
        let sizes_ok = self.sizes.is_empty() || product.sizes.iter().any(|s| self.sizes.contains(s));
        let colors_ok =
            self.colors.is_empty() || product.colors.iter().any(|c| self.colors.contains(&c.name));
        let min_ok = self.min_price.map_or(true, |min| product.price >= min);
        let max_ok = self.max_price.map_or(true, |max| product.price <= max);

        type_ok && tags_ok && sizes_ok && colors_ok && min_ok && max_ok
    }

    /// Narrows a listing, keeping its order.
    pub fn apply<'a>(&self, listing: Listing<'a>) -> Listing<'a> {
        listing
            .into_iter()
            .filter(|(_, product)| self.matches(product))
            .collect()
    }
}

// =============================================================================
// Facets
// =============================================================================

/// Values the filter UI offers, each in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub types: Vec<String>,
    pub tags: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

pub fn facets(catalog: &Catalog) -> Facets {
    let mut facets = Facets::default();
    for (_, product) in catalog.iter() {
        if let Some(kind) = &product.kind {
            push_unique(&mut facets.types, kind);
        }
        for tag in &product.tags {
            push_unique(&mut facets.tags, tag);
        }
        for size in &product.sizes {
            push_unique(&mut facets.sizes, size);
        }
        for color in &product.colors {
            push_unique(&mut facets.colors, &color.name);
        }
        facets.min_price = Some(facets.min_price.map_or(product.price, |p| p.min(product.price)));
        facets.max_price = Some(facets.max_price.map_or(product.price, |p| p.max(product.price)));
    }
    facets
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
