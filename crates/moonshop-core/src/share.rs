//! # Sharing and Checkout
//!
//! Builds the links and the order message that carry a cart out of the
//! storefront.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► share_token() ──► share_url()                                │
//! │                               https://shop.example/?cart=4fK9..-Qz81aB  │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                              checkout_message()                         │
//! │                                "¡Buenas! Estoy interesado en ..."       │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                              whatsapp_link()                            │
//! │                                https://wa.me/<number>?text=...          │
//! │                                                                         │
//! │  The shop owner opens the link ──► token_from_url() ──► restore         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use url::Url;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};

/// Query parameter carrying the token.
pub const DEFAULT_QUERY_PARAM: &str = "cart";

const GREETING: &str = "¡Buenas! Estoy interesado en comprar:";

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Checkout URL for a token.
///
/// Keeps the base's scheme, host and path; any existing query or fragment
/// is dropped.
///
/// ## Example
/// ```rust
/// use moonshop_core::share::share_url;
///
/// let url = share_url("https://shop.example/tienda?x=1#top", "cart", "abc-123").unwrap();
/// assert_eq!(url, "https://shop.example/tienda?cart=abc-123");
/// ```
pub fn share_url(base_url: &str, query_param: &str, token: &str) -> CoreResult<String> {
    let mut url = Url::parse(base_url)?;
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut().append_pair(query_param, token);
    Ok(url.to_string())
}

/// Pulls the token back out of a visited link. `Ok(None)` when the link
/// has no such parameter or it is empty.
pub fn token_from_url(url: &str, query_param: &str) -> CoreResult<Option<String>> {
    let url = Url::parse(url)?;
    Ok(url
        .query_pairs()
        .find(|(key, _)| key == query_param)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty()))
}

/// The order message sent to the shop.
///
/// ```text
/// ¡Buenas! Estoy interesado en comprar:
///
/// • Remera (Blanco) (L) - Cantidad: 2 - $24.000
/// • Gorra - Cantidad: 1 - $8.500
///
/// Total: $32.500
///
/// https://shop.example/?cart=...
/// ```
pub fn checkout_message(cart: &Cart, verification_url: &str) -> String {
    let mut message = format!("{GREETING}\n\n");
    for item in cart.items() {
        message.push_str(&format!(
            "• {} - Cantidad: {} - {}\n",
            item.name,
            item.quantity,
            item.line_total()
        ));
    }
    message.push_str(&format!("\nTotal: {}", cart.total()));
    message.push_str(&format!("\n\n{verification_url}"));
    message
}

/// `https://wa.me/<number>?text=<message>`.
///
/// ## Errors
/// `InvalidUrl` when the number is empty or not all digits.
pub fn whatsapp_link(number: &str, message: &str) -> CoreResult<String> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidUrl(format!(
            "WhatsApp number must be digits only, got '{number}'"
        )));
    }

    let mut url = Url::parse(WHATSAPP_BASE)?.join(number)?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url.to_string())
}
