//! Subcommand implementations.

pub mod encode;
pub mod inspect;
pub mod link;
pub mod restore;
pub mod search;

use std::path::Path;

use clap::Args;
use moonshop_core::{Cart, CartItem};

use crate::error::CliResult;

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Cart file: JSON array of cart lines, as the storefront stores them.
    pub cart_file: String,
}

/// Arguments for the link command.
#[derive(Args)]
pub struct LinkArgs {
    /// Cart file: JSON array of cart lines.
    pub cart_file: String,

    /// Print only the share URL.
    #[arg(long)]
    pub url_only: bool,
}

/// Arguments for the restore command.
#[derive(Args)]
pub struct RestoreArgs {
    /// Cart token, or a share URL carrying one.
    pub input: String,
}

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Cart token, or a share URL carrying one.
    pub token: String,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text matched against product name, type and tags.
    #[arg(default_value = "")]
    pub term: String,

    /// Only products of these types.
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Print matches as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Reads a storefront cart file.
pub fn read_cart_file(path: impl AsRef<Path>) -> CliResult<Cart> {
    let contents = std::fs::read_to_string(path)?;
    parse_cart(&contents)
}

fn parse_cart(json: &str) -> CliResult<Cart> {
    let items: Vec<CartItem> = serde_json::from_str(json)?;
    Ok(Cart::from_items(items))
}
