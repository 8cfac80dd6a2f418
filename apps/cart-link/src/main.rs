//! # cart-link
//!
//! Command line front end for MoonShop cart links.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          cart-link                                      │
//! │                                                                         │
//! │  encode  <cart.json>      ──► token                                     │
//! │  link    <cart.json>      ──► share URL + checkout message              │
//! │  restore <token-or-url>   ──► restored cart (storage JSON)              │
//! │  inspect <token-or-url>   ──► inspection report (JSON)                  │
//! │  search  <term>           ──► matching catalog entries                  │
//! │                                                                         │
//! │  --config <shop.toml>   --catalog <inventory.json>                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG` aware)
//! 2. Load shop configuration and the inventory
//! 3. Run the subcommand; any error exits with status 1

mod commands;
mod context;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EncodeArgs, InspectArgs, LinkArgs, RestoreArgs, SearchArgs};
use context::AppContext;
use error::CliResult;

/// MoonShop cart links: mint, restore and inspect shared cart tokens
#[derive(Parser)]
#[command(name = "cart-link")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Shop config file (default: platform config dir shop.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Inventory file, overriding the configured path
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token for a cart file
    Encode(EncodeArgs),

    /// Print the share URL and checkout message for a cart file
    Link(LinkArgs),

    /// Restore a cart from a token or share URL
    Restore(RestoreArgs),

    /// Show everything a token carries and whether it verifies
    Inspect(InspectArgs),

    /// Search the catalog
    Search(SearchArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.catalog.as_deref()).await?;

    match cli.command {
        Commands::Encode(args) => commands::encode::run(args, &ctx).await,
        Commands::Link(args) => commands::link::run(args, &ctx).await,
        Commands::Restore(args) => commands::restore::run(args, &ctx).await,
        Commands::Inspect(args) => commands::inspect::run(args, &ctx).await,
        Commands::Search(args) => commands::search::run(args, &ctx).await,
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - everything
/// - default: `warn,moonshop_core=info,moonshop_inventory=info,cart_link=info`
///
/// Logs go to stderr so stdout stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,moonshop_core=info,moonshop_inventory=info,cart_link=info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cart-link",
            "restore",
            "abc-123",
            "--catalog",
            "inventory.json",
        ])
        .unwrap();
        assert_eq!(cli.catalog.as_deref(), Some("inventory.json"));
        assert!(matches!(cli.command, Commands::Restore(ref a) if a.input == "abc-123"));
    }
}
