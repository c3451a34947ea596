//! Persisted cart blob.

use tracing::{debug, warn};
use yammi_core::CartLine;

use super::{KeyValueStore, StorageError};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cartItems";

/// Reads and writes the cart as a single JSON array under [`CART_KEY`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Wrap a key-value store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the persisted lines.
    ///
    /// An absent key, an unreadable value, or content that does not parse
    /// all read as an empty cart. Nothing is surfaced to the caller.
    pub async fn load(&self) -> Vec<CartLine> {
        let raw = match self.store.get(CART_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(items) => {
                let read = items.len();
                let items = repair(items);
                if items.len() != read {
                    warn!(read, kept = items.len(), "Repaired persisted cart");
                }
                debug!(lines = items.len(), "Loaded persisted cart");
                items
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is not valid, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted lines with `items`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, items: &[CartLine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(CART_KEY, &raw).await?;
        debug!(lines = items.len(), "Persisted cart");
        Ok(())
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CART_KEY).await
    }
}

/// Restore the cart line invariants on data written by someone else.
///
/// Lines with quantity 0 are dropped. Repeated ids are merged into the first
/// line, summing quantities.
fn repair(items: Vec<CartLine>) -> Vec<CartLine> {
    let mut kept: Vec<CartLine> = Vec::with_capacity(items.len());
    for line in items.into_iter().filter(|line| line.quantity > 0) {
        if let Some(existing) = kept.iter_mut().find(|k| k.id() == line.id()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            kept.push(line);
        }
    }
    kept
}
