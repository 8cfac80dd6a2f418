//! # Cart Token Codec
//!
//! Turns a cart into a short, URL-safe string and back.
//!
//! ## Token Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ENCODE                                                                 │
//! │                                                                         │
//! │  [CartItem] ──► records ──► "S00111:2,Gorra_default_default:1|2921..." │
//! │                                      │ UTF-8 bytes                      │
//! │                                      ▼                                  │
//! │                        one big-endian integer ──► base 62              │
//! │                                      │                                  │
//! │                                      ▼  "4fK9...Qz" (compressed)        │
//! │            SHA-256(compressed ++ secret) ──► base 62 ──► first 8 chars │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                     token = "<compressed>-<digest>"                     │
//! │                                                                         │
//! │  DECODE runs the same steps backwards, checking the digest BEFORE      │
//! │  touching the payload.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Acceptance Rules
//! - The token splits into exactly two parts on `-`
//! - The received digest must be a non-empty PREFIX of the recomputed one
//! - A token older than the freshness window is still decoded; it is only
//!   flagged [`DecodedCart::stale`] and logged

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::CatalogIndex;
use crate::error::{TokenError, TokenResult, ValidationError};
use crate::types::{CartItem, Catalog, DecodedCart, DecodedItem};
use crate::validation::{validate_payload_segment, validate_quantity};
use crate::{DEFAULT_DIGEST_LEN, STALE_AFTER_DAYS};

use super::base62::{base62_to_integer, bytes_to_integer, integer_to_base62, integer_to_bytes};
use super::digest::{truncated_digest, verify, year_secret};
use super::item::{decode_item, encode_item, parse_record, verbose_record, ItemRecord};
use super::payload::{build_payload, minutes_since_epoch, parse_payload};

/// Separates the compressed payload from the digest.
pub const TOKEN_SEPARATOR: char = '-';

// =============================================================================
// Codec Config
// =============================================================================

/// Tunables of the token format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Shared secret mixed into the digest.
    pub secret: String,

    /// Digest characters kept in minted tokens.
    pub digest_len: usize,

    /// Age in minutes after which a token is flagged stale.
    pub stale_after_minutes: i64,
}

impl CodecConfig {
    /// Default settings with an explicit secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        CodecConfig {
            secret: secret.into(),
            digest_len: DEFAULT_DIGEST_LEN,
            stale_after_minutes: STALE_AFTER_DAYS * 24 * 60,
        }
    }
}

impl Default for CodecConfig {
    /// Seeds the secret with the current calendar year.
    fn default() -> Self {
        Self::with_secret(year_secret(Utc::now().year()))
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Encoder/decoder bound to one catalog snapshot and one secret.
///
/// There is no global state: every call reads the index and config held
/// here, so several codecs over different catalogs can coexist.
#[derive(Debug, Clone, Default)]
pub struct CartTokenCodec {
    index: CatalogIndex,
    config: CodecConfig,
}

impl CartTokenCodec {
    pub fn new(index: CatalogIndex, config: CodecConfig) -> Self {
        CartTokenCodec { index, config }
    }

    /// Builds the index from `catalog` and wraps it.
    pub fn with_catalog(catalog: Catalog, config: CodecConfig) -> Self {
        Self::new(CatalogIndex::build(catalog), config)
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes a cart stamped with the current time.
    pub fn encode(&self, items: &[CartItem]) -> TokenResult<String> {
        self.encode_at(items, Utc::now())
    }

    /// Encodes a cart stamped with `now`.
    ///
    /// ## Errors
    /// `Unencodable` when a line could not be restored from the token:
    /// - the variant id is empty, or contains `,` `|` or a control character
    /// - the quantity is outside `1..=MAX_ITEM_QUANTITY`
    /// - the variant id would be written verbatim but reads back as the
    ///   compact record of another product (e.g. `S00111`)
    pub fn encode_at(&self, items: &[CartItem], now: DateTime<Utc>) -> TokenResult<String> {
        let records = items
            .iter()
            .map(|item| self.encode_line(item))
            .collect::<TokenResult<Vec<String>>>()?;

        let payload = build_payload(&records, minutes_since_epoch(now));
        let compressed = compress(&payload);
        let digest = truncated_digest(&compressed, &self.config.secret, self.config.digest_len);

        debug!(items = items.len(), token_len = compressed.len() + digest.len() + 1, "Cart token minted");

        Ok(format!("{compressed}{TOKEN_SEPARATOR}{digest}"))
    }

    fn encode_line(&self, item: &CartItem) -> TokenResult<String> {
        validate_payload_segment("variant id", &item.id)
            .map_err(|err| unencodable("variant id", &item.id, err))?;
        validate_quantity(item.quantity)
            .map_err(|err| unencodable("quantity", &item.quantity.to_string(), err))?;

        let record = encode_item(item, &self.index);
        if record == verbose_record(item) && decode_item(&record, &self.index).variant_id != item.id {
            return Err(TokenError::Unencodable {
                field: "variant id",
                value: item.id.clone(),
                reason: "reads back as a compact record of another product".to_string(),
            });
        }
        Ok(record)
    }

    /// Decodes a token against the current time.
    pub fn decode(&self, token: &str) -> TokenResult<DecodedCart> {
        self.decode_at(token, Utc::now())
    }

    /// Decodes a token, judging staleness against `now`.
    ///
    /// Individual records never fail here; a record whose quantity did
    /// not parse comes back with `quantity: None` for the caller to reject.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> TokenResult<DecodedCart> {
        let (compressed, received) = split_token(token)?;

        if !verify(compressed, received, &self.config.secret) {
            return Err(TokenError::Integrity);
        }

        let payload = decompress(compressed)?;
        let parsed = parse_payload(&payload)?;

        let items: Vec<DecodedItem> = parsed
            .records
            .iter()
            .map(|record| decode_item(record, &self.index))
            .collect();

        let age_minutes = minutes_since_epoch(now).saturating_sub(parsed.minutes);
        let stale = age_minutes > self.config.stale_after_minutes;
        if stale {
            warn!(
                age_minutes,
                limit_minutes = self.config.stale_after_minutes,
                "Cart token is past its freshness window; decoding anyway"
            );
        }

        Ok(DecodedCart {
            items,
            minted_at_minutes: parsed.minutes,
            stale,
        })
    }

    /// Takes a token apart without failing, for diagnostics.
    pub fn inspect(&self, token: &str) -> TokenInspection {
        let mut inspection = TokenInspection {
            token: token.to_string(),
            ..TokenInspection::default()
        };

        let (compressed, received) = match split_token(token) {
            Ok(parts) => parts,
            Err(err) => {
                inspection.problems.push(err.to_string());
                return inspection;
            }
        };

        inspection.compressed = compressed.to_string();
        inspection.received_digest = received.to_string();
        inspection.expected_digest =
            truncated_digest(compressed, &self.config.secret, self.config.digest_len);
        inspection.digest_ok = verify(compressed, received, &self.config.secret);
        if !inspection.digest_ok {
            inspection.problems.push(TokenError::Integrity.to_string());
        }

        let payload = match decompress(compressed) {
            Ok(payload) => payload,
            Err(err) => {
                inspection.problems.push(err.to_string());
                return inspection;
            }
        };

        match parse_payload(&payload) {
            Ok(parsed) => {
                inspection.minted_at_minutes = Some(parsed.minutes);
                inspection.records = parsed
                    .records
                    .iter()
                    .map(|record| RecordInspection {
                        record: record.to_string(),
                        shape: RecordShape::from(parse_record(record)),
                        decoded: decode_item(record, &self.index),
                    })
                    .collect();
            }
            Err(err) => inspection.problems.push(err.to_string()),
        }
        inspection.payload = Some(payload);

        inspection
    }
}

fn split_token(token: &str) -> TokenResult<(&str, &str)> {
    let parts: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
    match parts.as_slice() {
        [_, ""] => Err(TokenError::EmptyDigest),
        [compressed, digest] => Ok((*compressed, *digest)),
        _ => Err(TokenError::Format { parts: parts.len() }),
    }
}

fn unencodable(field: &'static str, value: &str, err: ValidationError) -> TokenError {
    TokenError::Unencodable {
        field,
        value: value.to_string(),
        reason: err.to_string(),
    }
}

fn compress(payload: &str) -> String {
    integer_to_base62(&bytes_to_integer(payload.as_bytes()))
}

fn decompress(compressed: &str) -> TokenResult<String> {
    let bytes = integer_to_bytes(&base62_to_integer(compressed)?);
    if bytes.is_empty() {
        return Err(TokenError::EmptyPayload);
    }
    Ok(String::from_utf8(bytes)?)
}

// =============================================================================
// Inspection
// =============================================================================

/// Which grammar a record matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordShape {
    Compact,
    Verbose,
    Malformed,
}

impl From<ItemRecord<'_>> for RecordShape {
    fn from(record: ItemRecord<'_>) -> Self {
        match record {
            ItemRecord::Compact { .. } => RecordShape::Compact,
            ItemRecord::Verbose { .. } => RecordShape::Verbose,
            ItemRecord::Malformed => RecordShape::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInspection {
    pub record: String,
    pub shape: RecordShape,
    pub decoded: DecodedItem,
}

/// Everything that can be read out of a token, valid or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInspection {
    pub token: String,
    pub compressed: String,
    pub received_digest: String,
    pub expected_digest: String,
    pub digest_ok: bool,
    pub payload: Option<String>,
    pub minted_at_minutes: Option<i64>,
    pub records: Vec<RecordInspection>,
    /// Human-readable reasons the token would not decode.
    pub problems: Vec<String>,
}

impl TokenInspection {
    /// True when `decode` would accept the token.
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::item::POSITION_CAPACITY;
    use crate::types::{Color, Product};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    const SECRET: &str = "MOONSHOP_SECRET_2026";

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

    fn codec() -> CartTokenCodec {
        CartTokenCodec::with_catalog(
            Catalog::from_entries([("remera".to_string(), remera())]),
            CodecConfig::with_secret(SECRET),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
    }

    fn line(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: id.to_string(),
            price: 12000,
            quantity,
            color: None,
            size: None,
        }
    }

    fn payload_of(token: &str) -> String {
        let (compressed, _) = split_token(token).unwrap();
        decompress(compressed).unwrap()
    }

    #[test]
    fn test_concrete_scenario() {
        let codec = codec();
        let token = codec.encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();

        let payload = payload_of(&token);
        assert_eq!(payload, format!("S00111:2|{}", minutes_since_epoch(now())));

        let decoded = codec.decode_at(&token, now()).unwrap();
        assert!(!decoded.stale);
        assert_eq!(
            decoded.items,
            vec![DecodedItem {
                variant_id: "Remera_Blanco_L".into(),
                product_id: Some("S001".into()),
                color_name: "Blanco".into(),
                size: "L".into(),
                quantity: Some(2),
            }]
        );
    }

    #[test]
    fn test_token_shape() {
        let token = codec().encode_at(&[line("Remera_Negro_M", 1)], now()).unwrap();
        let (compressed, digest) = token.split_once('-').unwrap();
        assert_eq!(digest.len(), 8);
        assert!(compressed.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(digest.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_empty_cart_round_trip() {
        let codec = codec();
        let token = codec.encode_at(&[], now()).unwrap();
        let decoded = codec.decode_at(&token, now()).unwrap();
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.minted_at_minutes, minutes_since_epoch(now()));
    }

    #[test]
    fn test_every_digest_character_is_tamper_evident() {
        let codec = codec();
        let token = codec.encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();
        let (compressed, digest) = token.split_once('-').unwrap();

        for i in 0..digest.len() {
            let mut chars: Vec<char> = digest.chars().collect();
            chars[i] = if chars[i] == 'a' { 'b' } else { 'a' };
            let tampered: String = chars.into_iter().collect();
            let err = codec
                .decode_at(&format!("{compressed}-{tampered}"), now())
                .unwrap_err();
            assert!(err.is_integrity_error(), "position {i}: {err}");
        }
    }

    #[test]
    fn test_edited_payload_fails_integrity() {
        let codec = codec();
        let token = codec.encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();
        let mut chars: Vec<char> = token.chars().collect();
        chars[0] = if chars[0] == '1' { '2' } else { '1' };
        let edited: String = chars.into_iter().collect();
        assert!(matches!(codec.decode_at(&edited, now()), Err(TokenError::Integrity)));
    }

    #[test]
    fn test_shorter_digest_prefix_is_accepted() {
        let codec = codec();
        let token = codec.encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();
        let short = &token[..token.len() - 4];
        assert!(codec.decode_at(short, now()).is_ok());
    }

    #[test]
    fn test_other_secret_fails_integrity() {
        let token = codec().encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();
        let other = CartTokenCodec::new(
            codec().index().clone(),
            CodecConfig::with_secret("MOONSHOP_SECRET_2025"),
        );
        assert!(other.decode_at(&token, now()).unwrap_err().is_integrity_error());
    }

    #[test]
    fn test_format_errors() {
        let codec = codec();
        assert!(matches!(codec.decode("abc"), Err(TokenError::Format { parts: 1 })));
        assert!(matches!(codec.decode("a-b-c"), Err(TokenError::Format { parts: 3 })));
        assert!(matches!(codec.decode("abc-"), Err(TokenError::EmptyDigest)));
    }

    #[test]
    fn test_foreign_character_is_decompression_error() {
        let codec = codec();
        // digest over the exact compressed text passes, so decompression is reached
        let compressed = "abc_def";
        let digest = truncated_digest(compressed, SECRET, 8);
        let err = codec.decode(&format!("{compressed}-{digest}")).unwrap_err();
        assert!(err.is_decompression_error());
    }

    #[test]
    fn test_zero_payload_is_decompression_error() {
        let codec = codec();
        let digest = truncated_digest("0", SECRET, 8);
        let err = codec.decode(&format!("0-{digest}")).unwrap_err();
        assert!(matches!(err, TokenError::EmptyPayload));
    }

    #[test]
    fn test_eight_day_old_token_still_decodes() {
        let codec = codec();
        let minted = now() - Duration::days(8);
        let token = codec.encode_at(&[line("Remera_Negro_M", 3)], minted).unwrap();

        let decoded = codec.decode_at(&token, now()).unwrap();
        assert!(decoded.stale);
        assert_eq!(decoded.items[0].variant_id, "Remera_Negro_M");
        assert_eq!(decoded.items[0].quantity, Some(3));
    }

    #[test]
    fn test_six_day_old_token_is_fresh() {
        let codec = codec();
        let token = codec
            .encode_at(&[line("Remera_Negro_M", 1)], now() - Duration::days(6))
            .unwrap();
        assert!(!codec.decode_at(&token, now()).unwrap().stale);
    }

    #[test]
    fn test_verbose_fallback_round_trip() {
        let codec = codec();
        let token = codec.encode_at(&[line("Buzo Oversize_Gris_XL", 4)], now()).unwrap();
        assert!(payload_of(&token).starts_with("Buzo Oversize_Gris_XL:4|"));

        let decoded = codec.decode_at(&token, now()).unwrap();
        assert_eq!(
            decoded.items,
            vec![DecodedItem {
                variant_id: "Buzo Oversize_Gris_XL".into(),
                product_id: None,
                color_name: "default".into(),
                size: "default".into(),
                quantity: Some(4),
            }]
        );
    }

    #[test]
    fn test_unicode_variant_ids_survive() {
        let codec = codec();
        let token = codec.encode_at(&[line("Pañuelo_Añil_Único", 1)], now()).unwrap();
        let decoded = codec.decode_at(&token, now()).unwrap();
        assert_eq!(decoded.items[0].variant_id, "Pañuelo_Añil_Único");
    }

    #[test]
    fn test_separator_in_variant_id_is_unencodable() {
        let codec = codec();
        let err = codec.encode_at(&[line("Remera,Buzo", 1)], now()).unwrap_err();
        assert!(matches!(err, TokenError::Unencodable { field: "variant id", .. }));
        assert!(codec.encode_at(&[line("a|b", 1)], now()).is_err());
    }

    #[test]
    fn test_control_characters_are_unencodable() {
        // a leading NUL byte would vanish in the integer embedding
        let err = codec().encode_at(&[line("\0Buzo_x_y", 1)], now()).unwrap_err();
        assert!(matches!(err, TokenError::Unencodable { field: "variant id", .. }));
        assert!(codec().encode_at(&[line("Buzo\n_x_y", 1)], now()).is_err());
    }

    #[test]
    fn test_quantity_out_of_range_is_unencodable() {
        let codec = codec();
        for quantity in [0, 1000] {
            let err = codec.encode_at(&[line("Remera_Negro_M", quantity)], now()).unwrap_err();
            assert!(matches!(err, TokenError::Unencodable { field: "quantity", .. }));
        }
        assert!(codec.encode_at(&[line("Remera_Negro_M", 999)], now()).is_ok());
    }

    #[test]
    fn test_verbose_id_shaped_like_known_compact_record_is_unencodable() {
        let codec = codec();
        // "S00111:2" would decode as Remera_Blanco_L
        let err = codec.encode_at(&[line("S00111", 2)], now()).unwrap_err();
        assert!(matches!(err, TokenError::Unencodable { field: "variant id", .. }));

        // same shape, unknown product: reads back verbatim
        let token = codec.encode_at(&[line("X99900", 2)], now()).unwrap();
        let decoded = codec.decode_at(&token, now()).unwrap();
        assert_eq!(decoded.items[0].variant_id, "X99900");
        assert_eq!(decoded.items[0].quantity, Some(2));
    }

    #[test]
    fn test_empty_index_encodes_everything_verbose() {
        let codec = CartTokenCodec::new(CatalogIndex::empty(), CodecConfig::with_secret(SECRET));
        let token = codec.encode_at(&[line("Remera_Blanco_L", 2)], now()).unwrap();
        assert!(payload_of(&token).starts_with("Remera_Blanco_L:2|"));
    }

    #[test]
    fn test_inspect_reports_records_and_problems() {
        let codec = codec();
        let token = codec
            .encode_at(&[line("Remera_Blanco_L", 2), line("Gorra_default_default", 1)], now())
            .unwrap();

        let inspection = codec.inspect(&token);
        assert!(inspection.is_valid());
        assert!(inspection.digest_ok);
        assert_eq!(inspection.received_digest, inspection.expected_digest);
        assert_eq!(inspection.records.len(), 2);
        assert_eq!(inspection.records[0].shape, RecordShape::Compact);
        assert_eq!(inspection.records[1].shape, RecordShape::Verbose);

        let tampered = format!("{}-zzzzzzzz", inspection.compressed);
        let inspection = codec.inspect(&tampered);
        assert!(!inspection.digest_ok);
        assert!(!inspection.is_valid());
        // payload is still shown for debugging
        assert!(inspection.payload.is_some());

        let inspection = codec.inspect("nonsense");
        assert_eq!(inspection.problems.len(), 1);
    }

    #[test]
    fn test_default_config_uses_year_secret() {
        let config = CodecConfig::default();
        assert_eq!(config.secret, year_secret(Utc::now().year()));
        assert_eq!(config.digest_len, 8);
        assert_eq!(config.stale_after_minutes, 7 * 24 * 60);
    }

    /// Every position a compact record can carry.
    fn full_palette() -> Product {
        Product {
            id: Some("P001".into()),
            name: "Paleta".into(),
            colors: (0..POSITION_CAPACITY).map(|i| Color::named(format!("C{i}"))).collect(),
            sizes: (0..POSITION_CAPACITY).map(|i| format!("T{i}")).collect(),
            ..remera()
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            lines in proptest::collection::vec((0usize..16, 0usize..16, 1u32..=999), 0..20)
        ) {
            let product = full_palette();
            let codec = CartTokenCodec::with_catalog(
                Catalog::from_entries([("paleta".to_string(), product.clone())]),
                CodecConfig::with_secret(SECRET),
            );
            let items: Vec<CartItem> = lines
                .iter()
                .map(|&(c, s, q)| {
                    CartItem::for_selection(
                        &product,
                        Some(product.colors[c].name.as_str()),
                        Some(product.sizes[s].as_str()),
                        q,
                    )
                })
                .collect();

            let token = codec.encode_at(&items, now()).unwrap();
            let decoded = codec.decode_at(&token, now()).unwrap();

            prop_assert_eq!(decoded.items.len(), items.len());
            for (item, back) in items.iter().zip(&decoded.items) {
                prop_assert_eq!(&back.variant_id, &item.id);
                prop_assert_eq!(Some(&back.color_name), item.color.as_ref());
                prop_assert_eq!(Some(&back.size), item.size.as_ref());
                prop_assert_eq!(back.quantity, Some(item.quantity));
            }
        }
    }
}
