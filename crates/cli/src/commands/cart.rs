//! Cart rendering.

use std::io::{self, Write};

use yammi_core::{Cart, CartLine};
use yammi_storefront::state::AppState;

/// Print the current cart with totals.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn show(state: &AppState) -> io::Result<()> {
    let cart = state.cart().snapshot();
    let mut out = io::stdout().lock();
    render(&mut out, &cart)
}

fn render(out: &mut impl Write, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    for line in &cart.items {
        writeln!(out, "{}", line_row(line))?;
    }
    writeln!(out, "{}", "-".repeat(48))?;
    writeln!(
        out,
        "{} items, total {}",
        cart.total_count(),
        cart.total_price()
    )
}

fn line_row(line: &CartLine) -> String {
    format!(
        "#{:<4} {:<24} {:>9} x{:<3} {:>10}",
        line.id().to_string(),
        line.product.name,
        line.product.sale_price.to_string(),
        line.quantity,
        line.line_total().to_string()
    )
}
