//! CLI command implementations.
//!
//! Commands print to stdout; logs go to stderr.

pub mod cart;
pub mod products;
