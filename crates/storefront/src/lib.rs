//! Smoochiie storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`cart`] - Local-storage cart: store, views, click routing
//! - [`search`] - Catalog filter and search modal
//! - [`markup`] - Page element model and the id/class contract
//! - [`webhook`] - PayPal capture handling
//! - [`routes`] - HTTP surface (`/health`, `/webhooks/paypal`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod markup;
pub mod middleware;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;
pub mod webhook;
