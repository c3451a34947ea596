//! Yammi CLI - Browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the first two catalog pages
//! yammi products --pages 2
//!
//! # Show a product
//! yammi product 3
//!
//! # Manage the cart
//! yammi cart add 3
//! yammi cart increase 3
//! yammi cart show
//! yammi cart clear
//!
//! # Buy a product directly, bypassing the cart
//! yammi buy 3
//! ```
//!
//! # Commands
//!
//! - `products` - Paginated catalog listing
//! - `product` - Product detail
//! - `cart` - Cart inspection and mutations
//! - `buy` - Direct purchase
//!
//! Configuration comes from `YAMMI_*` environment variables (see
//! `yammi_storefront::config`). Logs go to stderr; `RUST_LOG` controls them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yammi_core::ProductId;
use yammi_storefront::config::StorefrontConfig;
use yammi_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "yammi")]
#[command(author, version, about = "Yammi storefront CLI")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products page by page
    Products {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Ask the server to refresh its product feed first
        #[arg(long)]
        refresh: bool,
    },
    /// Show product details
    Product {
        /// Product id
        id: ProductId,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Buy one unit of a product without adding it to the cart
    Buy {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Increase a line's quantity by one
    Increase {
        /// Product id
        id: ProductId,
    },
    /// Decrease a line's quantity by one (never below one)
    Decrease {
        /// Product id
        id: ProductId,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Remove every line
    Clear,
    /// Sync with the server, then reload the persisted cart
    Refresh,
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yammi_storefront=info,yammi=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config).await?;

    match cli.command {
        Commands::Products { pages, refresh } => {
            commands::products::list(&state, pages, refresh).await?;
        }
        Commands::Product { id } => commands::products::show(&state, id).await?,
        Commands::Buy { id } => commands::products::buy(&state, id).await?,
        Commands::Cart { action } => {
            // Hydrate from storage first, as every cart-aware screen does on focus
            state.cart().load_from_storage().await;

            match action {
                CartAction::Show => {}
                CartAction::Add { id } => {
                    let product = state.product(id)?.clone();
                    state.cart().add_to_cart(&product).await?;
                    tracing::info!(product = %product.name, "Added to cart");
                }
                CartAction::Increase { id } => state.cart().increase_quantity(id).await?,
                CartAction::Decrease { id } => state.cart().decrease_quantity(id).await?,
                CartAction::Remove { id } => state.cart().remove_from_cart(id).await?,
                CartAction::Clear => state.cart().clear_cart().await?,
                CartAction::Refresh => state.cart().refresh().await,
            }

            commands::cart::show(&state)?;
        }
    }
    Ok(())
}
