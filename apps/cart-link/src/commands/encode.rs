//! Mint a token for a cart file.

use tracing::debug;

use super::{read_cart_file, EncodeArgs};
use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Run the encode command.
pub async fn run(args: EncodeArgs, ctx: &AppContext) -> CliResult<()> {
    let cart = read_cart_file(&args.cart_file)?;
    if cart.is_empty() {
        return Err(CliError::cart("Cart is empty, nothing to share"));
    }

    let token = ctx.codec().await.encode(cart.items())?;
    debug!(lines = cart.line_count(), len = token.len(), "Token minted");

    println!("{token}");
    Ok(())
}
