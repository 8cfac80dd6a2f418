//! Restore a shared cart.
//!
//! Accepts the token itself or the whole share URL a customer pasted.
//! The restored cart is printed in the storefront's storage format.

use moonshop_core::share::token_from_url;
use moonshop_core::{Cart, DecodedCart};
use tracing::{info, warn};

use super::RestoreArgs;
use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Run the restore command.
pub async fn run(args: RestoreArgs, ctx: &AppContext) -> CliResult<()> {
    let (cart, decoded) = restore_cart(ctx, &args.input).await?;

    let minted_at = decoded.minted_at().map(|t| t.to_rfc3339());
    if decoded.stale {
        warn!(?minted_at, "Cart link is older than the freshness window");
    } else {
        info!(?minted_at, lines = cart.line_count(), "Cart restored");
    }

    println!("{}", serde_json::to_string_pretty(&cart)?);
    Ok(())
}

/// Rebuilds a cart from a token or share URL against the loaded catalog.
pub async fn restore_cart(ctx: &AppContext, input: &str) -> CliResult<(Cart, DecodedCart)> {
    let token = token_from_input(input, &ctx.config.share.query_param)?;

    let codec = ctx.codec().await;
    let mut cart = Cart::new();
    let decoded = cart.restore_from_token(&codec, &token)?;
    Ok((cart, decoded))
}

/// Extracts the token from a share URL, or takes the input as a bare token.
pub fn token_from_input(input: &str, query_param: &str) -> CliResult<String> {
    let input = input.trim();
    let is_url = url::Url::parse(input)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if !is_url {
        return Ok(input.to_string());
    }

    token_from_url(input, query_param)?.ok_or_else(|| {
        CliError::validation(format!("URL carries no '{query_param}' parameter"))
    })
}
