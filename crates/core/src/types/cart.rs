//! Cart state and its reducer.
//!
//! [`Cart`] is a plain value: every change goes through [`CartAction`] and
//! [`reduce`] (or [`Cart::apply`]). Effects such as persistence, remote sync
//! and change notifications are orchestrated by the storefront's cart store,
//! never here.
//!
//! # Invariants
//!
//! - At most one [`CartLine`] per product id.
//! - Lines keep insertion order.
//! - A line's quantity never drops below 1; decreasing at 1 is a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One product's quantity entry within a cart.
///
/// Serialized flat: the product's fields followed by `quantity` and
/// `addedAt`, which is the layout of the persisted cart blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    /// When the line was added, or last re-added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub const fn new(product: Product, added_at: DateTime<Utc>) -> Self {
        Self {
            product,
            quantity: 1,
            added_at,
        }
    }

    /// The line's identity.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Sale price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.sale_price.times(self.quantity)
    }
}

/// A state transition of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product. `at` becomes the line's timestamp.
    Add { product: Product, at: DateTime<Utc> },
    /// Increment a line's quantity.
    Increase(ProductId),
    /// Decrement a line's quantity, floored at 1.
    Decrease(ProductId),
    /// Remove a line.
    Remove(ProductId),
    /// Remove every line.
    Clear,
    /// Reading persisted items has started.
    LoadStarted,
    /// Persisted items were read.
    Loaded(Vec<CartLine>),
    /// Items were written to storage and become the current items.
    Saved(Vec<CartLine>),
    /// The persisted blob was deleted.
    StorageCleared,
}

/// The cart: ordered lines plus a flag set while storage is being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub loading: bool,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id() == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|line| line.id() == id)
    }

    /// Σ sale price × quantity.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Apply an action in place.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add { product, at } => {
                if let Some(line) = self.line_mut(product.id) {
                    line.quantity = line.quantity.saturating_add(1);
                    line.added_at = at;
                } else {
                    self.items.push(CartLine::new(product, at));
                }
            }
            CartAction::Increase(id) => {
                if let Some(line) = self.line_mut(id) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            CartAction::Decrease(id) => {
                if let Some(line) = self.line_mut(id) {
                    if line.quantity > 1 {
                        line.quantity -= 1;
                    }
                }
            }
            CartAction::Remove(id) => {
                self.items.retain(|line| line.id() != id);
            }
            CartAction::Clear | CartAction::StorageCleared => {
                self.items.clear();
            }
            CartAction::LoadStarted => {
                self.loading = true;
            }
            CartAction::Loaded(items) => {
                self.items = items;
                self.loading = false;
            }
            CartAction::Saved(items) => {
                self.items = items;
            }
        }
    }
}

/// Pure reducer: the cart that results from applying `action` to `cart`.
#[must_use]
pub fn reduce(mut cart: Cart, action: CartAction) -> Cart {
    cart.apply(action);
    cart
}
