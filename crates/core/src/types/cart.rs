//! Cart items and the cart itself.
//!
//! A cart is an ordered list of lines. Two lines describing the same product
//! (same normalized name, price and image) share a [`CartItemId`], so adding
//! the same product twice bumps the quantity instead of adding a second row.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::price::Price;

/// Errors that can occur when building a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// The product name is empty after trimming.
    #[error("cart item name cannot be empty")]
    EmptyName,
    /// The quantity is zero.
    #[error("cart item quantity must be at least 1")]
    ZeroQuantity,
}

/// Deterministic identity of a cart line.
///
/// Derived as the hex SHA-256 of `lowercase(name|price|image)` where `name`
/// and `image` are trimmed and `price` is in canonical form.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CartItemId(String);

impl CartItemId {
    /// Derive the identity for a product.
    #[must_use]
    pub fn derive(name: &str, price: Price, image: &str) -> Self {
        let key = format!("{}|{}|{}", name.trim(), price.canonical(), image.trim()).to_lowercase();
        let digest = Sha256::digest(key.as_bytes());
        Self(hex::encode(digest))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CartItemId {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }
}

impl From<String> for CartItemId {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

const fn one() -> u32 {
    1
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line identity; recomputed from the other fields on [`CartItem::revalidate`].
    #[serde(default)]
    pub id: CartItemId,
    /// Display name, trimmed.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL, trimmed; empty when the product has no image.
    #[serde(default)]
    pub image: String,
    /// Quantity, at least 1.
    #[serde(rename = "qty", default = "one")]
    pub quantity: u32,
}

impl CartItem {
    /// Create a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError::EmptyName`] if the trimmed name is empty.
    pub fn new(name: &str, price: Price, image: &str) -> Result<Self, CartItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CartItemError::EmptyName);
        }
        let image = image.trim();

        Ok(Self {
            id: CartItemId::derive(name, price, image),
            name: name.to_owned(),
            price,
            image: image.to_owned(),
            quantity: 1,
        })
    }

    /// Re-normalize a line read back from storage.
    ///
    /// The stored identity is never trusted; it is derived again so that the
    /// deduplication invariant holds even for carts written by older code.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the quantity is zero.
    pub fn revalidate(self) -> Result<Self, CartItemError> {
        if self.quantity == 0 {
            return Err(CartItemError::ZeroQuantity);
        }
        let mut item = Self::new(&self.name, self.price, &self.image)?;
        item.quantity = self.quantity;
        Ok(item)
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An ordered sequence of cart lines with unique identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, merging lines that share an identity.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        cart
    }

    /// Add a line. If a line with the same identity exists its quantity is
    /// increased by the added quantity, otherwise the line is appended.
    ///
    /// Returns the resulting quantity of that line.
    pub fn add(&mut self, item: CartItem) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|existing| existing.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return existing.quantity;
        }
        let quantity = item.quantity;
        self.items.push(item);
        quantity
    }

    /// Remove the line with the given identity.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, id: &CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn price(raw: &str) -> Price {
        Price::parse_display(raw).unwrap()
    }

    fn item(name: &str, raw_price: &str) -> CartItem {
        CartItem::new(name, price(raw_price), "img/a.png").unwrap()
    }

    #[test]
    fn test_identity_is_normalized() {
        let a = CartItemId::derive("  Catnip Toy ", price("4.50"), " IMG/A.png");
        let b = CartItemId::derive("catnip toy", price("4.5"), "img/a.png");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_identity_differs_by_price() {
        let a = CartItemId::derive("Toy", price("4"), "");
        let b = CartItemId::derive("Toy", price("5"), "");
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_rejects_blank_name() {
        assert_eq!(
            CartItem::new("   ", price("1"), ""),
            Err(CartItemError::EmptyName)
        );
    }

    #[test]
    fn test_repeated_add_increments_quantity() {
        let mut cart = Cart::new();
        for expected in 1..=5 {
            assert_eq!(cart.add(item("Plush", "$9.99")), expected);
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(item("B", "1"));
        cart.add(item("A", "1"));
        cart.add(item("B", "1"));
        let names: Vec<_> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("A", "1"));
        let before = cart.clone();
        assert!(!cart.remove(&CartItemId::from("nope")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_known() {
        let mut cart = Cart::new();
        let first = item("A", "1");
        let id = first.id.clone();
        cart.add(first);
        cart.add(item("B", "2"));
        assert!(cart.remove(&id));
        assert!(cart.get(&id).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);
        cart.add(item("A", "1.25"));
        cart.add(item("A", "1.25"));
        cart.add(item("B", "10"));
        assert_eq!(cart.total().to_string(), "$12.50");
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let mut twice = item("A", "1");
        twice.quantity = 2;
        let cart = Cart::from_items([item("A", "1"), twice]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_storage_shape() {
        let mut cart = Cart::new();
        cart.add(item("A", "2"));
        let json = serde_json::to_value(&cart).unwrap();
        let line = &json[0];
        assert_eq!(line["name"], "A");
        assert_eq!(line["qty"], 1);
        assert_eq!(line["image"], "img/a.png");
        assert!(line["id"].is_string());
    }

    #[test]
    fn test_revalidate_rederives_identity() {
        let stored: CartItem =
            serde_json::from_str(r#"{"id":"stale","name":" A ","price":2,"qty":3}"#).unwrap();
        let item = stored.revalidate().unwrap();
        assert_eq!(item.id, CartItemId::derive("A", price("2"), ""));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_revalidate_rejects_zero_quantity() {
        let stored: CartItem = serde_json::from_str(r#"{"name":"A","price":2,"qty":0}"#).unwrap();
        assert_eq!(stored.revalidate(), Err(CartItemError::ZeroQuantity));
    }
}
