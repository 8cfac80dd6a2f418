//! # moonshop-core: Pure Cart Logic for the MoonShop Storefront
//!
//! This crate is the **heart** of MoonShop's shareable carts. It holds the
//! catalog model, the cart, and the cart token codec as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MoonShop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cart-link (CLI)                              │   │
//! │  │      encode ──► link ──► restore ──► inspect ──► search         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          moonshop-inventory (catalog loading, config)           │   │
//! │  │      inventory.json ──► Catalog ──► CatalogStore (hot swap)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ moonshop-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  catalog  │  │   codec   │  │   cart    │  │   │
//! │  │   │  Product  │  │   Index   │  │  base62   │  │   Cart    │  │   │
//! │  │   │  CartItem │  │ positions │  │  digest   │  │  restore  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Catalog, CartItem, DecodedCart)
//! - [`money`] - Whole-peso Money type with es-AR rendering
//! - [`catalog`] - CatalogIndex: product and variant position lookups
//! - [`codec`] - Cart token codec (records, payload, base 62, digest)
//! - [`cart`] - Cart operations and all-or-nothing restore
//! - [`share`] - Share URLs, checkout message, WhatsApp link
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules for anything written into a token
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: the codec owns its catalog index and secret; there is no global state
//! 2. **No I/O**: loading the inventory lives in moonshop-inventory
//! 3. **Soft Item Grammar**: an item that cannot be compacted is written verbose, never dropped
//! 4. **All or Nothing**: a restore either replaces the whole cart or leaves it untouched
//!
//! ## Example Usage
//!
//! ```rust
//! use moonshop_core::{Cart, CartItem, CartTokenCodec, Catalog, CodecConfig, Product};
//!
//! let remera = Product {
//!     id: Some("S001".into()),
//!     name: "Remera".into(),
//!     price: 12000,
//!     kind: None,
//!     colors: vec![],
//!     sizes: vec!["M".into(), "L".into()],
//!     tags: vec![],
//!     images: vec![],
//! };
//! let codec = CartTokenCodec::with_catalog(
//!     Catalog::from_entries([("remera".to_string(), remera.clone())]),
//!     CodecConfig::with_secret("MOONSHOP_SECRET_2026"),
//! );
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::for_selection(&remera, None, Some("L"), 2)).unwrap();
//! let token = cart.share_token(&codec).unwrap();
//!
//! let mut restored = Cart::new();
//! restored.restore_from_token(&codec, &token).unwrap();
//! assert_eq!(restored, cart);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod money;
pub mod share;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use moonshop_core::Money` instead of
// `use moonshop_core::money::Money`

pub use cart::Cart;
pub use catalog::CatalogIndex;
pub use codec::{CartTokenCodec, CodecConfig, TokenInspection};
pub use error::{CartError, CoreError, TokenError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Color or size segment of a variant id when nothing is selected.
pub const DEFAULT_VARIANT_SEGMENT: &str = "default";

/// Maximum distinct lines in a single cart.
///
/// ## Business Reason
/// Bounds the token length. Every line costs at least seven characters of
/// payload before base-62 expansion.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Digest characters kept in a minted token.
pub const DEFAULT_DIGEST_LEN: usize = 8;

/// Tokens older than this are flagged stale (and still decoded).
pub const STALE_AFTER_DAYS: i64 = 7;
