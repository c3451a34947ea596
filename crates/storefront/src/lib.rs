//! Yammi Storefront library.
//!
//! The state layer of the Yammi storefront: the cart store with local
//! persistence and best-effort remote sync, the static catalog, and catalog
//! pagination. Screens and other front ends consume [`state::AppState`].
//!
//! # Architecture
//!
//! - Local state is the source of truth; the remote API is advisory
//! - Pure cart transitions live in `yammi_core`; effects are orchestrated in
//!   [`services::cart`]
//! - Storage and remote API sit behind traits so services can be tested
//!   with in-memory fakes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
