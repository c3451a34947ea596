//! Catalog and product commands.
//!
//! # Usage
//!
//! ```bash
//! # First page only
//! yammi products
//!
//! # Keep scrolling: initial load plus two load-mores
//! yammi products --pages 3
//!
//! # Product detail and direct purchase
//! yammi product 7
//! yammi buy 7
//! ```

use std::io::{self, Write};

use yammi_core::{Product, ProductId};
use yammi_storefront::state::AppState;

/// Print the first `pages` pages of the catalog.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub async fn list(state: &AppState, pages: usize, refresh: bool) -> io::Result<()> {
    let loader = state.products();
    if refresh {
        loader.refresh().await;
    } else {
        loader.initial_load().await;
    }

    for _ in 1..pages {
        if !loader.load_more().await {
            break;
        }
    }

    let page = loader.snapshot();
    let mut out = io::stdout().lock();
    for product in page.items() {
        writeln!(out, "{}", summary_line(product))?;
    }

    if page.has_more() {
        writeln!(out, "-- more products available (--pages {}) --", page.cursor() + 1)?;
    } else {
        writeln!(out, "-- all products shown --")?;
    }
    Ok(())
}

/// Print one product's details.
///
/// # Errors
///
/// Returns an error if the product does not exist or writing fails.
pub async fn show(state: &AppState, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = state.product(id)?;
    let mut out = io::stdout().lock();

    writeln!(out, "{}", product.name)?;
    if product.has_discount() {
        writeln!(
            out,
            "  {} -> {} (-{}%)",
            product.original_price,
            product.sale_price,
            product.discount_percent()
        )?;
    } else {
        writeln!(out, "  {}", product.sale_price)?;
    }
    writeln!(out, "  {}", product.description)?;
    writeln!(out, "  {}", product.image)?;

    // Show how many are already in the cart
    state.cart().load_from_storage().await;
    if let Some(line) = state.cart().snapshot().line(id) {
        writeln!(out, "  in cart: {}", line.quantity)?;
    }
    Ok(())
}

/// Buy one unit of a product directly.
///
/// # Errors
///
/// Returns an error if the product does not exist or writing fails.
pub async fn buy(state: &AppState, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = state.product(id)?.clone();
    let receipt = state.cart().buy_now(&product).await;

    let mut out = io::stdout().lock();
    writeln!(out, "Purchased {} x{}", receipt.product_name, receipt.quantity)?;
    writeln!(out, "Amount: {}", receipt.amount)?;
    if !receipt.confirmed_remotely {
        writeln!(out, "(not confirmed by server)")?;
    }
    Ok(())
}

/// `#id  name  price  badge` for list views.
fn summary_line(product: &Product) -> String {
    let badge = if product.has_discount() {
        format!("  -{}%", product.discount_percent())
    } else {
        String::new()
    };
    format!(
        "#{:<4} {:<28} {:>10}{badge}",
        product.id.to_string(),
        product.name,
        product.sale_price.to_string()
    )
}
