//! Device-local key-value persistence.
//!
//! # Keys
//!
//! - `cartItems` - JSON array of cart lines (see [`CartPersistence`])
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key under the configured data directory
//! - [`MemoryStore`] - process-local map, used by tests and offline demos
//!
//! Writes replace the whole value; readers never observe a partial write.

mod cart;
mod file;
mod memory;

pub use cart::{CART_KEY, CartPersistence};
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Asynchronous string key-value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}
