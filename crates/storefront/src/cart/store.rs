//! The cart store: storage-backed cart with an in-memory mirror.

use serde_json::Value;
use smoochiie_core::{Cart, CartItem, CartItemError, CartItemId, Price, PriceError};
use thiserror::Error;
use tracing::{debug, warn};

use super::storage::{CART_KEY, CartStorage, StorageError};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why an add was refused. Nothing is stored when an add is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRejection {
    /// The price text was missing or not numeric.
    InvalidPrice(Option<PriceError>),
    /// The product name was missing or blank.
    InvalidName(CartItemError),
}

/// Result of [`CartStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The line now has `quantity` units.
    Added { id: CartItemId, quantity: u32 },
    /// The input was malformed.
    Rejected(AddRejection),
}

/// Storage-backed cart.
///
/// Storage is the source of truth. Every mutation re-reads the stored cart
/// before changing it, so a write from another tab is never overwritten by a
/// stale copy. Reads for rendering use the last cart read or written until
/// [`CartStore::on_storage_change`] reports that the cart key changed.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    mirror: Option<Cart>,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over `storage` using the default cart key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_KEY)
    }

    /// Create a store over `storage` using a custom key.
    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_owned(),
            mirror: None,
        }
    }

    /// The storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn cart(&mut self) -> Result<&Cart, CartError> {
        if self.mirror.is_none() {
            let raw = self.storage.get_item(&self.key)?;
            self.mirror = Some(raw.as_deref().map(decode_cart).unwrap_or_default());
        }
        Ok(self.mirror.get_or_insert_with(Cart::new))
    }

    /// The cart as currently stored, bypassing the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn reload(&mut self) -> Result<&Cart, CartError> {
        self.mirror = None;
        self.cart()
    }

    /// Add one unit of a product described by raw page values.
    ///
    /// `raw_price` may carry currency symbols (`"$12.99"`). Missing or
    /// malformed input is rejected without touching the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn add(
        &mut self,
        name: Option<&str>,
        raw_price: Option<&str>,
        image: Option<&str>,
    ) -> Result<AddOutcome, CartError> {
        let price = match raw_price.map(Price::parse_display) {
            Some(Ok(price)) => price,
            Some(Err(e)) => return Ok(AddOutcome::Rejected(AddRejection::InvalidPrice(Some(e)))),
            None => return Ok(AddOutcome::Rejected(AddRejection::InvalidPrice(None))),
        };
        let item = match CartItem::new(name.unwrap_or_default(), price, image.unwrap_or_default()) {
            Ok(item) => item,
            Err(e) => return Ok(AddOutcome::Rejected(AddRejection::InvalidName(e))),
        };
        self.add_item(item)
    }

    /// Add a validated line.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn add_item(&mut self, item: CartItem) -> Result<AddOutcome, CartError> {
        let id = item.id.clone();
        let mut cart = self.reload()?.clone();
        let quantity = cart.add(item);
        self.save(cart)?;
        debug!(item_id = %id, quantity, "Cart line added");
        Ok(AddOutcome::Added { id, quantity })
    }

    /// Remove a line. Unknown identities leave the cart unchanged.
    ///
    /// Returns `true` if a line was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn remove(&mut self, id: &CartItemId) -> Result<bool, CartError> {
        let mut cart = self.reload()?.clone();
        let removed = cart.remove(id);
        self.save(cart)?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.save(Cart::new())
    }

    /// Sum of price times quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn total(&mut self) -> Result<Price, CartError> {
        Ok(self.cart()?.total())
    }

    /// Sum of quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn count(&mut self) -> Result<u32, CartError> {
        Ok(self.cart()?.count())
    }

    /// React to a storage-change notification from another context.
    ///
    /// `key` is `None` when the whole storage was cleared. Returns `true`
    /// when the notification concerns the cart and views should be rebuilt.
    pub fn on_storage_change(&mut self, key: Option<&str>) -> bool {
        let affects_cart = key.is_none_or(|key| key == self.key);
        if affects_cart {
            self.mirror = None;
        }
        affects_cart
    }

    fn save(&mut self, cart: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&cart)?;
        self.storage.set_item(&self.key, &serialized)?;
        self.mirror = Some(cart);
        Ok(())
    }
}

/// Decode a stored cart, dropping anything that does not validate.
///
/// A value that is not a JSON array yields an empty cart.
#[must_use]
pub fn decode_cart(raw: &str) -> Cart {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Stored cart is corrupt; starting with an empty cart");
            return Cart::new();
        }
    };

    let items = entries.into_iter().enumerate().filter_map(|(index, entry)| {
        let item = serde_json::from_value::<CartItem>(entry)
            .map_err(|e| e.to_string())
            .and_then(|item| item.revalidate().map_err(|e| e.to_string()));
        match item {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(index, reason = %reason, "Dropping malformed stored cart line");
                None
            }
        }
    });

    Cart::from_items(items)
}
