//! Smoochiie Core - Shared types library.
//!
//! This crate provides the domain types used across the Smoochiie shop:
//! - `storefront` - Cart engine, catalog search, and the payment webhook service
//! - `cli` - Command-line tools for inspecting carts and catalogs
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, email addresses, cart items, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
