//! Cart store.
//!
//! [`CartStore`] owns the in-memory [`Cart`] and orchestrates the effects
//! around each transition. Every screen-level mutation runs the same
//! sequence:
//!
//! 1. mirror the mutation to the remote API (best effort, failures logged)
//! 2. apply the pure transition from `yammi_core`
//! 3. persist the full resulting item list
//! 4. broadcast [`CartEvent::Updated`]
//!
//! The remote outcome never changes what happens in steps 2-4.
//!
//! # Concurrency
//!
//! The cart sits behind a mutex that is never held across an `.await`.
//! Mutations issued concurrently interleave at their suspension points and
//! the persisted blob reflects whichever write lands last.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use yammi_core::{Cart, CartAction, CartLine, Price, Product, ProductId};

use crate::api::{ApiError, Mutation, StorefrontApi};
use crate::events::{CartEvent, CartEvents};
use crate::storage::{CartPersistence, KeyValueStore, StorageError};

/// Outcome of a direct purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Sale price times quantity.
    pub amount: Price,
    /// Whether the remote API acknowledged the purchase.
    pub confirmed_remotely: bool,
}

/// Injected cart state container.
///
/// Share it between consumers by reference or `Arc`; all of them observe
/// the same cart.
#[derive(Debug)]
pub struct CartStore<S, A> {
    cart: Mutex<Cart>,
    persistence: CartPersistence<S>,
    api: A,
    events: CartEvents,
}

impl<S: KeyValueStore, A: StorefrontApi> CartStore<S, A> {
    /// Create a store with an empty cart.
    pub fn new(store: S, api: A) -> Self {
        Self {
            cart: Mutex::new(Cart::new()),
            persistence: CartPersistence::new(store),
            api,
            events: CartEvents::new(),
        }
    }

    fn cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Current cart.
    pub fn snapshot(&self) -> Cart {
        self.cart().clone()
    }

    /// Σ sale price × quantity of the current cart.
    pub fn total_price(&self) -> Price {
        self.cart().total_price()
    }

    /// Σ quantity of the current cart.
    pub fn total_count(&self) -> u32 {
        self.cart().total_count()
    }

    /// Whether persisted items are being read.
    pub fn is_loading(&self) -> bool {
        self.cart().loading
    }

    /// Register for cart change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Apply a pure transition with no side effects and return the new cart.
    pub fn dispatch(&self, action: CartAction) -> Cart {
        let mut cart = self.cart();
        cart.apply(action);
        cart.clone()
    }

    // =========================================================================
    // Storage lifecycle
    // =========================================================================

    /// Replace the cart's items with the persisted ones.
    ///
    /// The loading flag is set for the duration of the read. Absent or
    /// unparsable data loads as an empty cart.
    pub async fn load_from_storage(&self) {
        self.dispatch(CartAction::LoadStarted);
        let items = self.persistence.load().await;
        self.dispatch(CartAction::Loaded(items));
    }

    /// Persist `items` verbatim, then make them the cart's items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; the cart is unchanged.
    pub async fn save_to_storage(&self, items: Vec<CartLine>) -> Result<(), StorageError> {
        self.persistence.save(&items).await?;
        self.dispatch(CartAction::Saved(items));
        Ok(())
    }

    /// Delete the persisted cart and empty the in-memory one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails; the cart is unchanged.
    pub async fn clear_storage(&self) -> Result<(), StorageError> {
        self.persistence.clear().await?;
        self.dispatch(CartAction::StorageCleared);
        Ok(())
    }

    // =========================================================================
    // Screen-level mutations
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails. The in-memory cart has
    /// already changed and listeners have been notified.
    pub async fn add_to_cart(&self, product: &Product) -> Result<(), StorageError> {
        self.mirror(Mutation::Add {
            product_id: product.id,
            quantity: 1,
        })
        .await;

        self.dispatch(CartAction::Add {
            product: product.clone(),
            at: Utc::now(),
        });
        self.persist_and_notify().await
    }

    /// Increment the quantity of `id`'s line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub async fn increase_quantity(&self, id: ProductId) -> Result<(), StorageError> {
        self.mirror(Mutation::Increase(id)).await;
        self.dispatch(CartAction::Increase(id));
        self.persist_and_notify().await
    }

    /// Decrement the quantity of `id`'s line, never below 1.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub async fn decrease_quantity(&self, id: ProductId) -> Result<(), StorageError> {
        self.mirror(Mutation::Decrease(id)).await;
        self.dispatch(CartAction::Decrease(id));
        self.persist_and_notify().await
    }

    /// Remove `id`'s line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub async fn remove_from_cart(&self, id: ProductId) -> Result<(), StorageError> {
        self.mirror(Mutation::Remove(id)).await;
        self.dispatch(CartAction::Remove(id));
        self.persist_and_notify().await
    }

    /// Empty the cart and delete the persisted blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if deleting the blob fails.
    pub async fn clear_cart(&self) -> Result<(), StorageError> {
        self.mirror(Mutation::Clear).await;
        self.dispatch(CartAction::Clear);

        let cleared = self.clear_storage().await;
        if let Err(e) = &cleared {
            error!(error = %e, "Failed to delete persisted cart");
        }
        self.events.emit(CartEvent::Updated);
        cleared
    }

    /// Best-effort remote cart fetch, then reload from storage.
    pub async fn refresh(&self) {
        if let Err(e) = self.api.fetch_cart().await {
            log_remote_failure("fetch_cart", &e);
        }
        self.load_from_storage().await;
    }

    /// Buy one unit of `product` directly. The cart is not touched.
    pub async fn buy_now(&self, product: &Product) -> PurchaseReceipt {
        let quantity = 1;
        let confirmed_remotely = self
            .mirror(Mutation::Purchase {
                product_id: product.id,
                quantity,
            })
            .await;

        PurchaseReceipt {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            amount: product.sale_price.times(quantity),
            confirmed_remotely,
        }
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Send `mutation` to the remote API, returning whether it was accepted.
    async fn mirror(&self, mutation: Mutation) -> bool {
        match self.api.send(&mutation).await {
            Ok(()) => true,
            Err(e) => {
                log_remote_failure(mutation.name(), &e);
                false
            }
        }
    }

    async fn persist_and_notify(&self) -> Result<(), StorageError> {
        let items = self.snapshot().items;
        let saved = self.save_to_storage(items).await;
        if let Err(e) = &saved {
            error!(error = %e, "Failed to persist cart");
        }
        self.events.emit(CartEvent::Updated);
        saved
    }
}

fn log_remote_failure(call: &str, err: &ApiError) {
    if matches!(err, ApiError::Disabled) {
        debug!(call, "Remote API disabled, skipping");
    } else {
        warn!(call, error = %err, "Remote call failed, keeping local state");
    }
}
