//! # Domain Types
//!
//! Core domain types used throughout MoonShop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Catalog      │   │    Product      │   │     Color       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  ordered        │──►│  id ("S001")    │──►│  name           │       │
//! │  │  key → Product  │   │  name (unique)  │   │  hex / image    │       │
//! │  │                 │   │  price, type    │   │  availableSizes │       │
//! │  └─────────────────┘   │  colors, sizes  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │   DecodedItem   │   │   DecodedCart   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (variant)   │   │  variant_id     │   │  items          │       │
//! │  │  name, price    │   │  product_id?    │   │  minted minutes │       │
//! │  │  quantity       │   │  color, size    │   │  stale flag     │       │
//! │  │  color?, size?  │   │  quantity?      │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Variant Identity
//! A cart line is identified by its variant id
//! `<productName>_<colorName|default>_<size|default>`, e.g. `Remera_Blanco_L`.
//! Product names are unique within a catalog, which makes the product name
//! prefix enough to resolve the product again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_VARIANT_SEGMENT;

// =============================================================================
// Color
// =============================================================================

/// A color option of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Color {
    /// Display name, also the color segment of the variant id.
    pub name: String,

    /// CSS color for the swatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,

    /// Image shown when this color is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Sizes sold in this color; `None` means every product size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_sizes: Option<Vec<String>>,
}

impl Color {
    /// Creates a plain color with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Color {
            name: name.into(),
            hex: None,
            image: None,
            available_sizes: None,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product of the storefront catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stable identifier, `<LetterPrefix><digits>` (e.g. `S001`).
    /// Older inventories omit it; the catalog key is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique display name.
    pub name: String,

    /// Unit price in whole currency units.
    #[ts(type = "number")]
    pub price: i64,

    /// Category (e.g. "remeras", "buzos").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Colors in declaration order.
    #[serde(default)]
    pub colors: Vec<Color>,

    /// Size tokens in declaration order.
    #[serde(default)]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_units(self.price)
    }

    /// Finds a color by name.
    pub fn color(&self, name: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Sizes offered for a color selection.
    ///
    /// A color with a restricted list only offers that list; otherwise
    /// every product size is offered.
    pub fn sizes_for(&self, color: Option<&str>) -> &[String] {
        color
            .and_then(|name| self.color(name))
            .and_then(|c| c.available_sizes.as_deref())
            .unwrap_or(&self.sizes)
    }

    /// Checks if the product needs a color or size choice before adding.
    pub fn has_options(&self) -> bool {
        !self.colors.is_empty() || !self.sizes.is_empty()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The full inventory: product key → product, in source order.
///
/// Order matters. Name resolution is first-match, so the catalog keeps its
/// entries exactly as the inventory file lists them instead of hashing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Product)>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from ordered entries. A repeated key replaces the
    /// earlier product in place.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Product)>,
    {
        let mut catalog = Catalog::new();
        for (key, product) in entries {
            catalog.insert(key, product);
        }
        catalog
    }

    /// Inserts or replaces a product under `key`.
    pub fn insert(&mut self, key: impl Into<String>, product: Product) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = product,
            None => self.entries.push((key, product)),
        }
    }

    /// Iterates `(key, product)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Product)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Gets a product by catalog key.
    pub fn get(&self, key: &str) -> Option<&Product> {
        self.iter().find(|(k, _)| *k == key).map(|(_, p)| p)
    }

    /// Key of the first entry whose product has `name`.
    pub fn key_for_name(&self, name: &str) -> Option<&str> {
        self.iter().find(|(_, p)| p.name == name).map(|(k, _)| k)
    }

    /// First product named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.iter().find(|(_, p)| p.name == name).map(|(_, p)| p)
    }

    /// First product whose explicit `id` field equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.iter()
            .find(|(_, p)| p.id.as_deref() == Some(id))
            .map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, product) in &self.entries {
            map.serialize_entry(key, product)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of product key to product")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog {
                    entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                };
                while let Some((key, product)) = map.next_entry::<String, Product>()? {
                    catalog.insert(key, product);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line of the shopping cart.
///
/// This is also the local-storage wire format of the browser cart, so the
/// field names stay exactly as the storefront writes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Variant id: `<productName>_<color|default>_<size|default>`.
    pub id: String,

    /// Display name: `Name (Color) (Size)`.
    pub name: String,

    /// Unit price at time of adding (frozen).
    #[ts(type = "number")]
    pub price: i64,

    /// Quantity in cart, always positive.
    pub quantity: u32,

    /// Selected color name.
    #[serde(default)]
    pub color: Option<String>,

    /// Selected size token.
    #[serde(default)]
    pub size: Option<String>,
}

impl CartItem {
    /// Creates a cart line for a product selection.
    ///
    /// ## Example
    /// ```rust
    /// use moonshop_core::{CartItem, Product};
    ///
    /// let product = Product {
    ///     id: Some("S001".into()),
    ///     name: "Remera".into(),
    ///     price: 12000,
    ///     kind: None,
    ///     colors: vec![],
    ///     sizes: vec!["M".into()],
    ///     tags: vec![],
    ///     images: vec![],
    /// };
    /// let item = CartItem::for_selection(&product, None, Some("M"), 1);
    /// assert_eq!(item.id, "Remera_default_M");
    /// assert_eq!(item.name, "Remera (M)");
    /// ```
    pub fn for_selection(
        product: &Product,
        color: Option<&str>,
        size: Option<&str>,
        quantity: u32,
    ) -> Self {
        CartItem {
            id: variant_id(&product.name, color, size),
            name: display_name(&product.name, color, size),
            price: product.price,
            quantity,
            color: color.map(str::to_owned),
            size: size.map(str::to_owned),
        }
    }

    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_units(self.price)
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// Builds a variant id from a selection.
pub fn variant_id(product_name: &str, color: Option<&str>, size: Option<&str>) -> String {
    format!(
        "{}_{}_{}",
        product_name,
        color.unwrap_or(DEFAULT_VARIANT_SEGMENT),
        size.unwrap_or(DEFAULT_VARIANT_SEGMENT)
    )
}

/// Builds the display name shown in the cart and checkout message.
pub fn display_name(product_name: &str, color: Option<&str>, size: Option<&str>) -> String {
    let mut name = product_name.to_string();
    if let Some(color) = color {
        name.push_str(&format!(" ({color})"));
    }
    if let Some(size) = size {
        name.push_str(&format!(" ({size})"));
    }
    name
}

// =============================================================================
// Decoded Token Content
// =============================================================================

/// One cart line as recovered from a token, before catalog conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DecodedItem {
    pub variant_id: String,

    /// Set only when the compact record resolved against the catalog.
    pub product_id: Option<String>,

    /// Color name, or `"default"`.
    pub color_name: String,

    /// Size token, or `"default"`.
    pub size: String,

    /// `None` when the record's quantity was unparseable.
    pub quantity: Option<u32>,
}

/// Everything a token carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DecodedCart {
    pub items: Vec<DecodedItem>,

    /// Minutes since the Unix epoch at which the token was minted.
    #[ts(type = "number")]
    pub minted_at_minutes: i64,

    /// Past the freshness window. Advisory only.
    pub stale: bool,
}

impl DecodedCart {
    /// Mint time as a timestamp, if representable.
    pub fn minted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.minted_at_minutes.checked_mul(60)?, 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
