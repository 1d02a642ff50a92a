//! Shopping cart kept in browser-style local storage.
//!
//! # Layers
//!
//! - [`storage`] - key-value backends (`MemoryStorage`, `FileStorage`)
//! - [`store`] - `CartStore`: add / remove / clear / totals, persisted on every mutation
//! - [`view`] - pure view-models for the count badge, mini-cart, bag, checkout and cart page
//! - [`intent`] - the click dispatch table
//! - [`controller`] - `CartController`: clicks and storage events in, effects out
//!
//! Tabs sharing one storage converge by last-write-wins: a tab that sees a
//! storage-change notification for the cart key drops its mirror and renders
//! again from storage.

pub mod controller;
pub mod intent;
pub mod product;
pub mod storage;
pub mod store;
pub mod view;

pub use controller::{CartController, ClickOutcome, Effect, Notice};
pub use intent::{DISPATCH_TABLE, Dispatch, Intent, Role, classify};
pub use product::ProductDetails;
pub use storage::{CART_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{AddOutcome, AddRejection, CartError, CartStore, decode_cart};
pub use view::{
    BagView, CartPageView, CartViews, CheckoutView, CountBadgeView, LineView, MiniCartView,
    Surface, render,
};
