//! Remote storefront API.
//!
//! # Architecture
//!
//! - The remote API is optional and advisory: local state is the source of
//!   truth, and every caller treats a failed call as "nothing happened"
//! - Plain JSON over HTTP via `reqwest`, one fixed timeout for every call
//! - The [`StorefrontApi`] trait is the seam the cart store and the catalog
//!   loader are generic over, so both can be driven by fakes in tests
//!
//! # Endpoints
//!
//! | call | request |
//! |------|---------|
//! | product page | `GET /api/products?page=&limit=` |
//! | product refresh | `GET /api/products/refresh` |
//! | cart refresh | `GET /api/cart` |
//! | cart mutations | see [`Mutation::route`] |

mod client;
mod types;

pub use client::ApiClient;
pub use types::{Mutation, MutationBody, Route};

use thiserror::Error;
use yammi_core::Product;

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No base URL is configured.
    #[error("remote API disabled")]
    Disabled,

    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status}")]
    Status { status: u16 },

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the storefront performs against the remote API.
pub trait StorefrontApi {
    /// Fetch one page of products.
    async fn fetch_products(&self, page: usize, limit: usize) -> Result<Vec<Product>, ApiError>;

    /// Ask the server to refresh its product feed.
    async fn refresh_products(&self) -> Result<(), ApiError>;

    /// Ask the server for the current cart. The response body is ignored.
    async fn fetch_cart(&self) -> Result<(), ApiError>;

    /// Mirror a cart mutation or direct purchase to the server.
    async fn send(&self, mutation: &Mutation) -> Result<(), ApiError>;
}

impl<A: StorefrontApi> StorefrontApi for std::sync::Arc<A> {
    async fn fetch_products(&self, page: usize, limit: usize) -> Result<Vec<Product>, ApiError> {
        (**self).fetch_products(page, limit).await
    }

    async fn refresh_products(&self) -> Result<(), ApiError> {
        (**self).refresh_products().await
    }

    async fn fetch_cart(&self) -> Result<(), ApiError> {
        (**self).fetch_cart().await
    }

    async fn send(&self, mutation: &Mutation) -> Result<(), ApiError> {
        (**self).send(mutation).await
    }
}
