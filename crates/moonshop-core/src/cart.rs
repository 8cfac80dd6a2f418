//! # Cart
//!
//! The storefront shopping cart and its token round trip.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action        Cart Method              Items Change         │
//! │  ─────────────────        ───────────              ────────────         │
//! │                                                                         │
//! │  Add to cart ────────────► add_item() ───────────► push / qty + 1       │
//! │  "+" / "-" ──────────────► update_quantity() ────► qty = n (≤ 0 drops)  │
//! │  Eliminar ───────────────► remove_item() ────────► retain               │
//! │  Checkout ───────────────► share_token() ────────► (read only)          │
//! │  Visit ?cart=<token> ────► restore_from_token() ─► replace ALL or none  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by variant id
//! - Quantity is always in `1..=MAX_ITEM_QUANTITY`
//! - At most [`MAX_CART_ITEMS`] lines

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::CartTokenCodec;
use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::types::{display_name, CartItem, DecodedCart, DecodedItem, Product};
use crate::validation::validate_quantity;
use crate::{DEFAULT_VARIANT_SEGMENT, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// Serializes as a bare array of [`CartItem`], the same shape the
/// storefront keeps in local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing lines, e.g. a cart read back from storage.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Cart { items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds a line or bumps an existing one.
    ///
    /// ## Behavior
    /// - Variant already in cart: quantity increases by ONE, whatever the
    ///   incoming quantity (the add button is a single click)
    /// - New variant: pushed with its own quantity
    pub fn add_item(&mut self, item: CartItem) -> CartResult<()> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let new_qty = existing.quantity.saturating_add(1);
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CartError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        validate_quantity(item.quantity)?;
        self.items.push(item);
        Ok(())
    }

    /// Removes a line by variant id.
    pub fn remove_item(&mut self, variant_id: &str) -> CartResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != variant_id);

        if self.items.len() == initial_len {
            Err(CartError::ItemNotInCart(variant_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Sets a line's quantity. Zero or below removes the line.
    pub fn update_quantity(&mut self, variant_id: &str, quantity: i64) -> CartResult<()> {
        if quantity <= 0 {
            return self.remove_item(variant_id);
        }

        if quantity > i64::from(MAX_ITEM_QUANTITY) {
            return Err(CartError::QuantityTooLarge {
                requested: u32::try_from(quantity).unwrap_or(u32::MAX),
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == variant_id)
            .ok_or_else(|| CartError::ItemNotInCart(variant_id.to_string()))?;
        // bounded above by MAX_ITEM_QUANTITY
        item.quantity = quantity as u32;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn item_by_variant(&self, variant_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == variant_id)
    }

    /// True when any variant of the product is in the cart.
    pub fn contains_product(&self, product_name: &str) -> bool {
        self.items.iter().any(|i| is_variant_of(&i.id, product_name))
    }

    /// Every line that is a variant of the product.
    pub fn product_variants(&self, product_name: &str) -> Vec<&CartItem> {
        self.items
            .iter()
            .filter(|i| is_variant_of(&i.id, product_name))
            .collect()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities (the badge on the cart icon).
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Token Round Trip
    // =========================================================================

    /// Mints a share token for the current cart.
    ///
    /// `None` means "do not offer a link": the cart is empty or could not
    /// be encoded. The reason is logged.
    pub fn share_token(&self, codec: &CartTokenCodec) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match codec.encode(&self.items) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(error = %err, "Cart cannot be shared");
                None
            }
        }
    }

    /// Replaces the cart with the content of a token.
    ///
    /// All or nothing: every decoded line must convert before the live
    /// items are touched. On any error the cart is left exactly as it was.
    pub fn restore_from_token(
        &mut self,
        codec: &CartTokenCodec,
        token: &str,
    ) -> CartResult<DecodedCart> {
        let decoded = codec.decode(token)?;
        let items = convert_decoded(codec, &decoded.items)?;

        info!(lines = items.len(), stale = decoded.stale, "Cart restored from token");
        self.items = items;
        Ok(decoded)
    }
}

fn is_variant_of(variant_id: &str, product_name: &str) -> bool {
    variant_id
        .strip_prefix(product_name)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// Turns decoded lines into cart lines against the codec's catalog.
///
/// Repeated variant ids are merged by summing quantities.
pub fn convert_decoded(codec: &CartTokenCodec, decoded: &[DecodedItem]) -> CartResult<Vec<CartItem>> {
    let mut items: Vec<CartItem> = Vec::with_capacity(decoded.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, line) in decoded.iter().enumerate() {
        let quantity = line.quantity.ok_or_else(|| CartError::Restore {
            index,
            reason: format!("quantity of '{}' is not a number", line.variant_id),
        })?;
        validate_quantity(quantity).map_err(|err| CartError::Restore {
            index,
            reason: err.to_string(),
        })?;

        let product = restore_product(codec, line).ok_or_else(|| CartError::Restore {
            index,
            reason: format!("no product matches '{}'", line.variant_id),
        })?;

        if let Some(&at) = positions.get(&line.variant_id) {
            let merged = &mut items[at];
            let total = merged.quantity.saturating_add(quantity);
            if total > MAX_ITEM_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: total,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            merged.quantity = total;
            continue;
        }

        if items.len() >= MAX_CART_ITEMS {
            return Err(CartError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let (color, size) = selection(line, product);
        positions.insert(line.variant_id.clone(), items.len());
        items.push(CartItem {
            id: line.variant_id.clone(),
            name: display_name(&product.name, color, size),
            price: product.price,
            quantity,
            color: color.map(str::to_owned),
            size: size.map(str::to_owned),
        });
    }

    Ok(items)
}

/// Product by decoded id first, then by the variant id's name prefix.
fn restore_product<'a>(codec: &'a CartTokenCodec, line: &DecodedItem) -> Option<&'a Product> {
    line.product_id
        .as_deref()
        .and_then(|id| codec.index().product(id))
        .or_else(|| codec.index().resolve_variant(&line.variant_id).map(|(_, p)| p))
}

/// Color and size of a restored line, `None` standing for "default".
///
/// Compact lines carry them already; verbose lines still spell them out
/// in the variant id after the product name.
fn selection<'a>(line: &'a DecodedItem, product: &Product) -> (Option<&'a str>, Option<&'a str>) {
    let (color, size) = if line.product_id.is_some() {
        (line.color_name.as_str(), line.size.as_str())
    } else {
        let rest = line
            .variant_id
            .strip_prefix(product.name.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(DEFAULT_VARIANT_SEGMENT);
        rest.split_once('_')
            .unwrap_or((rest, DEFAULT_VARIANT_SEGMENT))
    };

    let named = |segment: &'a str| Some(segment).filter(|s| *s != DEFAULT_VARIANT_SEGMENT && !s.is_empty());
    (named(color), named(size))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecConfig;
    use crate::types::{Catalog, Color};

    fn remera() -> Product {
        Product {
            id: Some("S001".into()),
            name: "Remera".into(),
            price: 12000,
            kind: Some("remeras".into()),
            colors: vec![Color::named("Negro"), Color::named("Blanco")],
            sizes: vec!["M".into(), "L".into()],
            tags: vec![],
            images: vec![],
        }
    }

    fn gorra() -> Product {
        Product {
            id: None,
            name: "Gorra".into(),
            price: 8500,
            colors: vec![],
            sizes: vec![],
            ..remera()
        }
    }

    fn codec() -> CartTokenCodec {
        CartTokenCodec::with_catalog(
            Catalog::from_entries([
                ("remera".to_string(), remera()),
                ("gorra".to_string(), gorra()),
            ]),
            CodecConfig::with_secret("MOONSHOP_SECRET_2026"),
        )
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartItem::for_selection(&remera(), Some("Blanco"), Some("L"), 2))
            .unwrap();
        cart.add_item(CartItem::for_selection(&gorra(), None, None, 1))
            .unwrap();
        cart
    }

    #[test]
    fn test_add_item() {
        let cart = sample_cart();
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total(), Money::from_units(32500));
    }

    #[test]
    fn test_add_same_variant_increments_by_one() {
        let mut cart = sample_cart();
        cart.add_item(CartItem::for_selection(&remera(), Some("Blanco"), Some("L"), 5))
            .unwrap();
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_by_variant("Remera_Blanco_L").map(|i| i.quantity), Some(3));
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(CartItem::for_selection(&remera(), None, None, 0))
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(CartItem::for_selection(&remera(), Some(format!("C{i}").as_str()), None, 1))
                .unwrap();
        }
        let err = cart
            .add_item(CartItem::for_selection(&gorra(), None, None, 1))
            .unwrap_err();
        assert!(matches!(err, CartError::CartTooLarge { max: 100 }));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = sample_cart();
        cart.update_quantity("Remera_Blanco_L", 7).unwrap();
        assert_eq!(cart.item_by_variant("Remera_Blanco_L").map(|i| i.quantity), Some(7));

        assert!(matches!(
            cart.update_quantity("Remera_Blanco_L", 1000),
            Err(CartError::QuantityTooLarge { requested: 1000, max: 999 })
        ));

        cart.update_quantity("Remera_Blanco_L", 0).unwrap();
        assert!(cart.item_by_variant("Remera_Blanco_L").is_none());

        assert!(matches!(
            cart.update_quantity("Nada_default_default", 2),
            Err(CartError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = sample_cart();
        cart.remove_item("Gorra_default_default").unwrap();
        assert_eq!(cart.line_count(), 1);
        assert!(cart.remove_item("Gorra_default_default").is_err());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_product_variant_queries() {
        let mut cart = sample_cart();
        cart.add_item(CartItem::for_selection(&remera(), Some("Negro"), Some("M"), 1))
            .unwrap();

        assert!(cart.contains_product("Remera"));
        assert!(!cart.contains_product("Rem"));
        assert_eq!(cart.product_variants("Remera").len(), 2);
        assert_eq!(cart.product_variants("Gorra").len(), 1);
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let cart = Cart::from_items(vec![CartItem::for_selection(&gorra(), None, None, 1)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_share_and_restore() {
        let codec = codec();
        let cart = sample_cart();
        let token = cart.share_token(&codec).unwrap();

        let mut restored = Cart::new();
        restored
            .add_item(CartItem::for_selection(&gorra(), None, None, 9))
            .unwrap();
        let decoded = restored.restore_from_token(&codec, &token).unwrap();

        assert!(!decoded.stale);
        assert_eq!(restored, cart);
        assert_eq!(
            restored.item_by_variant("Remera_Blanco_L").map(|i| i.name.as_str()),
            Some("Remera (Blanco) (L)")
        );
    }

    #[test]
    fn test_empty_cart_is_not_shared() {
        assert!(Cart::new().share_token(&codec()).is_none());
    }

    #[test]
    fn test_unencodable_cart_is_not_shared() {
        let cart = Cart::from_items(vec![CartItem {
            id: "Remera,Rota".into(),
            name: "Remera".into(),
            price: 1,
            quantity: 1,
            color: None,
            size: None,
        }]);
        assert!(cart.share_token(&codec()).is_none());
    }

    #[test]
    fn test_failed_restore_leaves_cart_untouched() {
        let codec = codec();
        let before = sample_cart();

        let mut cart = before.clone();
        assert!(cart.restore_from_token(&codec, "garbage").is_err());
        assert_eq!(cart, before);

        // second line names a product the catalog does not have
        let token = Cart::from_items(vec![
            CartItem::for_selection(&remera(), Some("Negro"), Some("M"), 1),
            CartItem {
                id: "Buzo_Gris_M".into(),
                name: "Buzo (Gris) (M)".into(),
                price: 20000,
                quantity: 1,
                color: Some("Gris".into()),
                size: Some("M".into()),
            },
        ])
        .share_token(&codec)
        .unwrap();

        let err = cart.restore_from_token(&codec, &token).unwrap_err();
        assert!(matches!(err, CartError::Restore { index: 1, .. }));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_unparseable_quantity_is_rejected() {
        let codec = codec();
        let decoded = vec![DecodedItem {
            variant_id: "Gorra_default_default".into(),
            product_id: None,
            color_name: "default".into(),
            size: "default".into(),
            quantity: None,
        }];
        assert!(matches!(
            convert_decoded(&codec, &decoded),
            Err(CartError::Restore { index: 0, .. })
        ));
    }

    #[test]
    fn test_repeated_variants_are_summed() {
        let codec = codec();
        let line = |q| DecodedItem {
            variant_id: "Remera_Negro_M".into(),
            product_id: Some("S001".into()),
            color_name: "Negro".into(),
            size: "M".into(),
            quantity: Some(q),
        };

        let items = convert_decoded(&codec, &[line(2), line(3)]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);

        assert!(matches!(
            convert_decoded(&codec, &[line(500), line(500)]),
            Err(CartError::QuantityTooLarge { requested: 1000, .. })
        ));
    }

    #[test]
    fn test_verbose_line_keeps_selection_from_variant_id() {
        let codec = codec();
        let decoded = vec![DecodedItem {
            variant_id: "Gorra_Azul_U".into(),
            product_id: None,
            color_name: "default".into(),
            size: "default".into(),
            quantity: Some(1),
        }];
        let items = convert_decoded(&codec, &decoded).unwrap();
        assert_eq!(items[0].name, "Gorra (Azul) (U)");
        assert_eq!(items[0].color.as_deref(), Some("Azul"));
        assert_eq!(items[0].price, 8500);
    }
}
