//! Application state shared across consumers.

use std::sync::Arc;

use yammi_core::{Product, ProductId};

use crate::api::ApiClient;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::services::{CartStore, CatalogLoader};
use crate::storage::FileStore;

/// Cart store as wired in the application.
pub type AppCartStore = CartStore<FileStore, ApiClient>;

/// Catalog loader as wired in the application.
pub type AppCatalogLoader = CatalogLoader<ApiClient>;

/// Application state shared across all consumers.
///
/// This struct is cheaply cloneable via `Arc`. Every clone sees the same
/// cart and the same catalog pagination state.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    api: ApiClient,
    cart: AppCartStore,
    products: AppCatalogLoader,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Loads the static catalog and builds the API client. The cart starts
    /// empty; call [`CartStore::load_from_storage`] to hydrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the HTTP client
    /// cannot be built.
    pub async fn new(config: StorefrontConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::load(config.catalog_path.as_deref()).await?);
        let api = ApiClient::new(&config.api)?;

        if api.is_enabled() {
            tracing::info!("Remote API enabled");
        } else {
            tracing::info!("Remote API not configured, running offline");
        }

        let cart = CartStore::new(FileStore::new(&config.data_dir), api.clone());
        let products = CatalogLoader::new(Arc::clone(&catalog), api.clone(), config.page_size);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                api,
                cart,
                products,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the static catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the remote API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &AppCartStore {
        &self.inner.cart
    }

    /// Get a reference to the catalog pagination loader.
    #[must_use]
    pub fn products(&self) -> &AppCatalogLoader {
        &self.inner.products
    }

    /// Look up a product for the detail view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` if the catalog has no such product.
    pub fn product(&self, id: ProductId) -> Result<&Product> {
        self.catalog().find(id).ok_or(AppError::ProductNotFound(id))
    }
}
