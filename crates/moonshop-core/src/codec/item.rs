//! Per-item record grammar.
//!
//! ## Record Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  COMPACT   <productId><colorHex><sizeHex>:<quantity>                   │
//! │            S001       1         1        :2          → "S00111:2"       │
//! │            productId = one A-Z letter + three or more digits           │
//! │            colorHex / sizeHex = exactly one of 0-9 a-f                 │
//! │                                                                         │
//! │  VERBOSE   <variantId>:<quantity>                                      │
//! │            "Gorra_default_default:1"                                   │
//! │            split on the LAST colon                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capacity Boundary
//! A position travels as ONE hex digit, so only positions 0..=15 are
//! representable. A product's 17th color (position 16) or beyond is
//! written as digit `0` and decodes as the first color. This is a known
//! limit of the record format and is logged, not corrected.

use tracing::{debug, warn};

use crate::catalog::CatalogIndex;
use crate::types::{CartItem, DecodedItem};
use crate::validation::is_compact_product_id;
use crate::DEFAULT_VARIANT_SEGMENT;

/// Number of color or size positions a compact record can carry.
pub const POSITION_CAPACITY: usize = 16;

/// A record as recognised by the tokenizer, before catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRecord<'a> {
    Compact {
        product_id: &'a str,
        color: u8,
        size: u8,
        quantity: u32,
    },
    Verbose {
        variant_id: &'a str,
        /// `None` when the text after the last colon is not a number.
        quantity: Option<u32>,
    },
    /// No colon at all.
    Malformed,
}

/// Tokenizes one record. Compact shape is tried first.
pub fn parse_record(record: &str) -> ItemRecord<'_> {
    if let Some(compact) = parse_compact(record) {
        return compact;
    }
    parse_verbose(record)
}

fn parse_compact(record: &str) -> Option<ItemRecord<'_>> {
    let (body, quantity) = record.split_once(':')?;
    let quantity = parse_quantity(quantity)?;

    // letter + 3 digits + 2 hex at minimum
    if !body.is_ascii() || body.len() < 6 {
        return None;
    }
    let (product_id, codes) = body.split_at(body.len() - 2);
    if !is_compact_product_id(product_id) {
        return None;
    }
    let codes = codes.as_bytes();

    Some(ItemRecord::Compact {
        product_id,
        color: hex_value(codes[0])?,
        size: hex_value(codes[1])?,
        quantity,
    })
}

fn parse_verbose(record: &str) -> ItemRecord<'_> {
    match record.rsplit_once(':') {
        Some((variant_id, quantity)) => ItemRecord::Verbose {
            variant_id,
            quantity: parse_quantity(quantity),
        },
        None => ItemRecord::Malformed,
    }
}

/// One or more ASCII digits that fit a `u32`.
fn parse_quantity(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Lowercase hex only.
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

fn hex_digit(position: usize, product_id: &str, kind: &str) -> char {
    if position >= POSITION_CAPACITY {
        warn!(
            product_id,
            kind,
            position,
            capacity = POSITION_CAPACITY,
            "Variant position exceeds compact record capacity; encoding as 0"
        );
        return '0';
    }
    char::from_digit(position as u32, 16).unwrap_or('0')
}

/// Splits the color and size segments off a variant id whose product
/// name has already been matched.
fn variant_segments<'a>(variant_id: &'a str, product_name: &str) -> (Option<&'a str>, Option<&'a str>) {
    let rest = variant_id
        .strip_prefix(product_name)
        .and_then(|rest| rest.strip_prefix('_'));
    match rest {
        Some(rest) => match rest.split_once('_') {
            Some((color, size)) => (Some(color), Some(size)),
            None => (Some(rest), None),
        },
        None => (None, None),
    }
}

// =============================================================================
// Encode
// =============================================================================

/// Encodes one cart line. Never fails: anything that cannot take the
/// compact shape is written as a verbose record.
pub fn encode_item(item: &CartItem, index: &CatalogIndex) -> String {
    let Some((product_id, product)) = index.resolve_variant(&item.id) else {
        debug!(variant_id = %item.id, "Product not resolvable; using verbose record");
        return verbose_record(item);
    };

    if !is_compact_product_id(product_id) {
        debug!(variant_id = %item.id, product_id, "Product id has no compact form; using verbose record");
        return verbose_record(item);
    }

    let (color, size) = variant_segments(&item.id, &product.name);
    let color_position = color
        .and_then(|c| index.color_position(product_id, c))
        .unwrap_or(0);
    let size_position = size
        .and_then(|s| index.size_position(product_id, s))
        .unwrap_or(0);

    format!(
        "{}{}{}:{}",
        product_id,
        hex_digit(color_position, product_id, "color"),
        hex_digit(size_position, product_id, "size"),
        item.quantity
    )
}

/// `<variantId>:<quantity>`, written when the compact shape is unavailable.
pub fn verbose_record(item: &CartItem) -> String {
    format!("{}:{}", item.id, item.quantity)
}

// =============================================================================
// Decode
// =============================================================================

/// Decodes one record. Never fails; an unparseable quantity comes back as
/// `None` for the caller to reject.
pub fn decode_item(record: &str, index: &CatalogIndex) -> DecodedItem {
    if let ItemRecord::Compact {
        product_id,
        color,
        size,
        quantity,
    } = parse_record(record)
    {
        if let Some(product) = index.product(product_id) {
            let color_name = product
                .colors
                .get(usize::from(color))
                .map_or(DEFAULT_VARIANT_SEGMENT, |c| c.name.as_str());
            let size = product
                .sizes
                .get(usize::from(size))
                .map_or(DEFAULT_VARIANT_SEGMENT, String::as_str);

            return DecodedItem {
                variant_id: format!("{}_{}_{}", product.name, color_name, size),
                product_id: Some(product_id.to_string()),
                color_name: color_name.to_string(),
                size: size.to_string(),
                quantity: Some(quantity),
            };
        }
        debug!(product_id, "Compact record names an unknown product; reading as verbose");
    }

    let (variant_id, quantity) = match parse_verbose(record) {
        ItemRecord::Verbose {
            variant_id,
            quantity,
        } => (variant_id, quantity),
        _ => (record, None),
    };

    DecodedItem {
        variant_id: variant_id.to_string(),
        product_id: None,
        color_name: DEFAULT_VARIANT_SEGMENT.to_string(),
        size: DEFAULT_VARIANT_SEGMENT.to_string(),
        quantity,
    }
}
