//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything the storefront can
//! surface to its caller. Remote API failures are deliberately absent from
//! the operation paths: they are logged and discarded where they happen and
//! only appear here when building the API client itself fails.

use thiserror::Error;
use yammi_core::ProductId;

use crate::api::ApiError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Static catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote API client could not be built.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No product with this id.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::ProductNotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "Product not found: 123");

        let err = AppError::from(CatalogError::DuplicateId(ProductId::new(4)));
        assert_eq!(err.to_string(), "Catalog error: duplicate product id 4");
    }

    #[test]
    fn test_storage_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = StorageError::from(io).into();
        assert!(matches!(err, AppError::Storage(StorageError::Io(_))));
        assert_eq!(err.to_string(), "Storage error: I/O error: read-only");
    }
}
