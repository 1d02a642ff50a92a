//! File-backed cart commands.
//!
//! The file holds the same key-value layout the browser keeps in local
//! storage, so a cart can be inspected or prepared outside the site.

use std::path::Path;

use tracing::{info, warn};

use smoochiie_core::CartItemId;
use smoochiie_storefront::cart::{AddOutcome, CartStore, FileStorage, LineView, Surface};

/// Cart file used when `--file` is not given.
pub const DEFAULT_CART_FILE: &str = "smoochiie-cart.json";

fn open(file: &Path) -> CartStore<FileStorage> {
    CartStore::new(FileStorage::new(file))
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the product is rejected or the file cannot be written.
pub fn add(
    file: &Path,
    name: &str,
    price: &str,
    image: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    match store.add(Some(name), Some(price), image)? {
        AddOutcome::Added { id, quantity } => {
            info!(id = %id, quantity, "Added to bag");
            Ok(())
        }
        AddOutcome::Rejected(reason) => Err(format!("Item rejected: {reason:?}").into()),
    }
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn remove(file: &Path, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    if store.remove(&CartItemId::from(id))? {
        info!(id, "Removed from bag");
    } else {
        warn!(id, "No such item in the bag");
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn clear(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    open(file).clear()?;
    info!(path = %file.display(), "Cart cleared");
    Ok(())
}

/// Log every line and the totals.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn show(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(file);
    let cart = store.cart()?;

    if cart.is_empty() {
        info!("Bag is empty");
        return Ok(());
    }

    for item in cart.items() {
        let line = LineView::project(item, Surface::Bag);
        info!(id = %line.id, name = %line.name, "{}", line.label);
    }
    info!(items = cart.count(), total = %cart.total(), "Bag total");
    Ok(())
}
