//! Integration tests for the Yammi storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yammi-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart persistence across restarts, offline
//! - `catalog_pagination` - Infinite scroll over the static catalog
//! - `remote_sync` - Mirroring and paging against a mock remote API
//!
//! The mock API ([`MockApi`]) is an in-process axum server bound to an
//! ephemeral port. It records every request and answers with a fixed
//! status, so tests can check both what was sent and how the client copes
//! with failures.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::task::JoinHandle;
use url::Url;
use yammi_core::Product;
use yammi_storefront::config::ApiConfig;

/// A request received by the mock API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    products: Arc<Vec<Product>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the storefront's remote API.
///
/// `GET /api/products` serves the whole configured product list whatever
/// the `page` and `limit` parameters say. Every other route answers `{}`. With a non-success status, every route answers that
/// status with an empty body.
pub struct MockApi {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Start a server answering `200 OK` and serving `products`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn healthy(products: Vec<Product>) -> Self {
        Self::start(StatusCode::OK, products).await
    }

    /// Start a server that answers `500` to everything.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn failing() -> Self {
        Self::start(StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).await
    }

    #[allow(clippy::expect_used)]
    async fn start(status: StatusCode, products: Vec<Product>) -> Self {
        let state = MockState {
            status,
            products: Arc::new(products),
            requests: Arc::default(),
        };

        let app = Router::new().fallback(record).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API");
        let addr = listener.local_addr().expect("mock API address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the server.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("mock API URL")
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: Some(self.base_url()),
            timeout: Duration::from_secs(3),
        }
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `METHOD /path` for every request received so far.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(State(state): State<MockState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let request = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);

    if !state.status.is_success() {
        return state.status.into_response();
    }

    if method == Method::GET && uri.path() == "/api/products" {
        return Json(state.products.as_ref().clone()).into_response();
    }

    Json(serde_json::json!({})).into_response()
}
