//! Fakes shared by unit tests.

use std::sync::Mutex;

use rust_decimal::Decimal;
use yammi_core::{Price, Product, ProductId};

use crate::api::{ApiError, Mutation, StorefrontApi};

/// A product with a round sale price and no discount.
pub fn product(id: i32, sale_price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Dish {id}"),
        original_price: Price::won(sale_price),
        discount_rate: Decimal::ZERO,
        sale_price: Price::won(sale_price),
        image: format!("https://images.yammi.app/products/{id}.jpg"),
        description: String::new(),
    }
}

/// `count` products with ids starting at `first_id`.
pub fn products(first_id: i32, count: i32) -> Vec<Product> {
    (first_id..first_id + count).map(|id| product(id, 1_000)).collect()
}

/// Scripted [`StorefrontApi`] that records what it was asked to do.
#[derive(Debug, Default)]
pub struct FakeApi {
    succeed: bool,
    /// Served as the response of every product page request, if set.
    product_page: Option<Vec<Product>>,
    sent: Mutex<Vec<Mutation>>,
    page_requests: Mutex<Vec<(usize, usize)>>,
    refreshes: Mutex<usize>,
}

impl FakeApi {
    /// Every call fails with a server error.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Every call succeeds; product pages are empty.
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            ..Self::default()
        }
    }

    /// Every call succeeds and product pages return `page`.
    pub fn serving(page: Vec<Product>) -> Self {
        Self {
            succeed: true,
            product_page: Some(page),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Mutation> {
        self.sent.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    pub fn page_requests(&self) -> Vec<(usize, usize)> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn outcome(&self) -> Result<(), ApiError> {
        if self.succeed {
            Ok(())
        } else {
            Err(ApiError::Status { status: 500 })
        }
    }
}

impl StorefrontApi for FakeApi {
    async fn fetch_products(&self, page: usize, limit: usize) -> Result<Vec<Product>, ApiError> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((page, limit));
        self.outcome()?;
        Ok(self.product_page.clone().unwrap_or_default())
    }

    async fn refresh_products(&self) -> Result<(), ApiError> {
        *self.refreshes.lock().unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
        self.outcome()
    }

    async fn fetch_cart(&self) -> Result<(), ApiError> {
        self.outcome()
    }

    async fn send(&self, mutation: &Mutation) -> Result<(), ApiError> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(*mutation);
        self.outcome()
    }
}
