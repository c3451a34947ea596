//! Storefront services.
//!
//! # Services
//!
//! - [`cart`] - Cart store: reducer state plus remote sync, persistence and
//!   change notifications
//! - [`catalog`] - Catalog pagination with remote-first, static-fallback loading
//!
//! Both are generic over the storage and API seams so they can be exercised
//! with in-memory stores and fake APIs.

pub mod cart;
pub mod catalog;

pub use cart::{CartStore, PurchaseReceipt};
pub use catalog::{CatalogLoader, CatalogPage};
