//! HTTP implementation of [`StorefrontApi`].

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;
use yammi_core::Product;

use super::{ApiError, Mutation, StorefrontApi};
use crate::config::ApiConfig;

/// Client for the remote storefront API.
///
/// Cheap to clone. Built without a base URL it performs no I/O and every
/// call fails with [`ApiError::Disabled`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone().map(with_trailing_slash),
            }),
        })
    }

    /// A client that never touches the network.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn offline() -> Result<Self, ApiError> {
        Self::new(&ApiConfig::default())
    }

    /// Whether a base URL is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.base_url.is_some()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_ref().ok_or(ApiError::Disabled)?;
        Ok(base.join(path)?)
    }

    /// Send a request and fail on non-success statuses.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

impl StorefrontApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self, page: usize, limit: usize) -> Result<Vec<Product>, ApiError> {
        let mut url = self.url("api/products")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());

        let request = self.inner.client.get(url);
        let products: Vec<Product> = self.execute(request).await?.json().await?;
        debug!(count = products.len(), "Fetched product page");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn refresh_products(&self) -> Result<(), ApiError> {
        let url = self.url("api/products/refresh")?;
        self.execute(self.inner.client.get(url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<(), ApiError> {
        let url = self.url("api/cart")?;
        self.execute(self.inner.client.get(url)).await?;
        Ok(())
    }

    #[instrument(skip(self, mutation), fields(mutation = mutation.name()))]
    async fn send(&self, mutation: &Mutation) -> Result<(), ApiError> {
        let route = mutation.route();
        let url = self.url(&route.path)?;

        let mut request = self.inner.client.request(route.method, url);
        if let Some(body) = mutation.body() {
            request = request.json(&body);
        }

        self.execute(request).await?;
        debug!("Remote mutation accepted");
        Ok(())
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yammi_core::ProductId;

    use super::*;

    #[test]
    fn test_with_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://api.yammi.app/v1").unwrap());
        assert_eq!(
            url.join("api/cart").unwrap().as_str(),
            "https://api.yammi.app/v1/api/cart"
        );

        let url = with_trailing_slash(Url::parse("https://api.yammi.app").unwrap());
        assert_eq!(
            url.join("api/cart").unwrap().as_str(),
            "https://api.yammi.app/api/cart"
        );
    }

    #[tokio::test]
    async fn test_offline_client_fails_fast() {
        let client = ApiClient::offline().unwrap();
        assert!(!client.is_enabled());
        assert!(matches!(
            client.fetch_products(0, 10).await,
            Err(ApiError::Disabled)
        ));
        assert!(matches!(
            client.send(&Mutation::Increase(ProductId::new(1))).await,
            Err(ApiError::Disabled)
        ));
    }
}
