//! Core types for the Smoochiie shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod price;

pub use cart::{Cart, CartItem, CartItemError, CartItemId};
pub use email::{Email, EmailError};
pub use price::{Price, PriceError};
