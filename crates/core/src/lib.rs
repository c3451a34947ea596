//! Yammi Core - Shared types library.
//!
//! This crate provides the types shared by every Yammi component:
//! - `storefront` - Cart store, catalog pagination, persistence and remote sync
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP clients. The cart reducer lives here so it can
//! be tested without network or storage stubs.
//!
//! # Modules
//!
//! - [`types`] - Product identity, prices, products, and the cart reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
