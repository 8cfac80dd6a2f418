//! Share URL and checkout message for a cart file.
//!
//! ```text
//! cart.json ──► token ──► https://shop/?cart=<token>
//!                               │
//!                               ▼
//!                checkout message (+ WhatsApp link when configured)
//! ```

use moonshop_core::share::{checkout_message, share_url, whatsapp_link};

use super::{read_cart_file, LinkArgs};
use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Run the link command.
pub async fn run(args: LinkArgs, ctx: &AppContext) -> CliResult<()> {
    let cart = read_cart_file(&args.cart_file)?;
    if cart.is_empty() {
        return Err(CliError::cart("Cart is empty, nothing to share"));
    }

    let token = ctx.codec().await.encode(cart.items())?;
    let share = &ctx.config.share;
    let url = share_url(&share.base_url, &share.query_param, &token)?;

    if args.url_only {
        println!("{url}");
        return Ok(());
    }

    let message = checkout_message(&cart, &url);
    println!("{url}\n");
    println!("{message}");

    if let Some(number) = &share.whatsapp_number {
        println!("\n{}", whatsapp_link(number, &message)?);
    }
    Ok(())
}
