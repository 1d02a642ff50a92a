//! Integration tests for the storage-backed cart.
//!
//! These exercise the cart through its public surface only: the store, the
//! view renderers and the click controller over a shared in-memory storage.

use smoochiie_core::{CartItemId, Price};
use smoochiie_storefront::cart::{
    AddOutcome, CART_KEY, CartController, CartPageView, CartStorage, CartStore, Effect,
    MemoryStorage, Notice, render,
};
use smoochiie_storefront::markup::{ClickPath, Element, SiteLinks, attrs, classes, ids};

fn price(raw: &str) -> Price {
    Price::parse_display(raw).expect("valid price")
}

// =============================================================================
// Store Properties
// =============================================================================

#[test]
fn test_repeated_adds_make_one_line() {
    let mut store = CartStore::new(MemoryStorage::new());
    for _ in 0..4 {
        store
            .add(Some("Pink Bunny"), Some("$12.99"), Some("bunny.png"))
            .expect("storage ok");
    }

    let cart = store.cart().expect("storage ok");
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items().first().expect("one line").quantity, 4);
}

#[test]
fn test_identity_ignores_case_and_surrounding_space() {
    let mut store = CartStore::new(MemoryStorage::new());
    store
        .add(Some("Pink Bunny"), Some("$12.99"), None)
        .expect("storage ok");
    store
        .add(Some("  pink bunny "), Some("12.99"), None)
        .expect("storage ok");

    assert_eq!(store.cart().expect("storage ok").len(), 1);
    assert_eq!(store.count().expect("storage ok"), 2);
}

#[test]
fn test_remove_unknown_leaves_cart_unchanged() {
    let mut store = CartStore::new(MemoryStorage::new());
    store.add(Some("Mug"), Some("$8"), None).expect("storage ok");
    let before = store.cart().expect("storage ok").clone();

    let removed = store
        .remove(&CartItemId::from("does-not-exist"))
        .expect("storage ok");
    assert!(!removed);
    assert_eq!(store.cart().expect("storage ok"), &before);
}

#[test]
fn test_total_is_sum_of_price_times_quantity() {
    let mut store = CartStore::new(MemoryStorage::new());
    assert_eq!(store.total().expect("storage ok"), Price::ZERO);

    store.add(Some("Mug"), Some("$12.99"), None).expect("storage ok");
    store.add(Some("Mug"), Some("$12.99"), None).expect("storage ok");
    store.add(Some("Pin"), Some("$0.50"), None).expect("storage ok");

    assert_eq!(store.total().expect("storage ok"), price("26.48"));
    assert_eq!(store.total().expect("storage ok").to_string(), "$26.48");
}

#[test]
fn test_non_numeric_price_is_rejected() {
    let mut store = CartStore::new(MemoryStorage::new());
    let outcome = store
        .add(Some("Mystery Box"), Some("Call us"), None)
        .expect("storage ok");

    assert!(matches!(outcome, AddOutcome::Rejected(_)));
    assert!(store.cart().expect("storage ok").is_empty());
}

#[test]
fn test_dollar_price_parses() {
    assert_eq!(price("$12.99"), price("12.99"));
    assert_eq!(price("1.2.3"), price("1.2"));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_mutations_persist_under_cart_key() {
    let storage = MemoryStorage::new();
    let mut store = CartStore::new(storage.clone());
    store.add(Some("Mug"), Some("$8"), None).expect("storage ok");

    let raw = storage
        .get_item(CART_KEY)
        .expect("storage ok")
        .expect("cart saved");
    let saved: serde_json::Value = serde_json::from_str(&raw).expect("json array");
    let line = saved.get(0).expect("one line");
    assert_eq!(line.get("name").and_then(|v| v.as_str()), Some("Mug"));
    assert_eq!(line.get("qty").and_then(serde_json::Value::as_u64), Some(1));

    store.clear().expect("storage ok");
    assert_eq!(
        storage.get_item(CART_KEY).expect("storage ok").as_deref(),
        Some("[]")
    );
}

#[test]
fn test_corrupt_storage_reads_as_empty() {
    let storage = MemoryStorage::new();
    storage
        .set_item(CART_KEY, "{ this is not a cart")
        .expect("storage ok");

    let mut store = CartStore::new(storage);
    assert!(store.cart().expect("storage ok").is_empty());
}

#[test]
fn test_other_tab_changes_show_after_notification() {
    let storage = MemoryStorage::new();
    let mut tab_a = CartStore::new(storage.clone());
    let mut tab_b = CartStore::new(storage);
    assert_eq!(tab_b.count().expect("storage ok"), 0);

    tab_a.add(Some("Mug"), Some("$8"), None).expect("storage ok");
    // tab b still shows its mirror until notified
    assert_eq!(tab_b.count().expect("storage ok"), 0);

    assert!(tab_b.on_storage_change(Some(CART_KEY)));
    assert_eq!(tab_b.count().expect("storage ok"), 1);
}

#[test]
fn test_unnotified_tab_does_not_overwrite_other_tab() {
    let storage = MemoryStorage::new();
    let mut tab_a = CartStore::new(storage.clone());
    let mut tab_b = CartStore::new(storage.clone());
    assert_eq!(tab_a.count().expect("storage ok"), 0);
    assert_eq!(tab_b.count().expect("storage ok"), 0);

    tab_b.add(Some("Bunny"), Some("$5"), None).expect("storage ok");
    tab_a.add(Some("Mug"), Some("$8"), None).expect("storage ok");

    let mut fresh = CartStore::new(storage);
    let cart = fresh.cart().expect("storage ok");
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.total().to_string(), "$13.00");
}

// =============================================================================
// Views and Clicks
// =============================================================================

#[test]
fn test_rendering_is_idempotent() {
    let mut store = CartStore::new(MemoryStorage::new());
    store.add(Some("Mug"), Some("$8"), None).expect("storage ok");
    let cart = store.cart().expect("storage ok");

    assert_eq!(render(cart), render(cart));
}

#[test]
fn test_empty_cart_page_message() {
    let mut store = CartStore::new(MemoryStorage::new());
    let views = render(store.cart().expect("storage ok"));
    assert_eq!(
        views.cart_page,
        CartPageView::Empty {
            message: "Your cart is empty.".to_string()
        }
    );
    assert_eq!(views.checkout.tax, "$0.00");
}

#[test]
fn test_add_click_then_checkout_click() {
    let page = Element::new("body")
        .with_child(
            Element::new("div")
                .with_class(classes::CARD)
                .with_child(Element::new("h3").with_text("Catnip Toy"))
                .with_child(Element::new("span").with_class(classes::PRICE).with_text("$4.50"))
                .with_child(Element::new("button").with_class(classes::ADD_TO_CART_BUTTON)),
        )
        .with_child(Element::new("button").with_id(ids::CHECKOUT_BUTTON));

    let mut controller =
        CartController::new(CartStore::new(MemoryStorage::new()), SiteLinks::default());
    let add = ClickPath::locate(&page, &[0, 2]).expect("button exists");
    let outcome = controller.handle_click(&add).expect("storage ok");

    assert!(outcome.prevent_default);
    assert!(outcome.effects.contains(&Effect::Notice(Notice::AddedToBag)));
    let views = controller.views().expect("storage ok");
    assert_eq!(views.count.count, 1);
    let line = views.mini_cart.lines.first().expect("one line");
    assert_eq!(line.label, "$4.50 × 1");
    assert_eq!(line.image_url, "https://placehold.co/60x60");

    let checkout = ClickPath::locate(&page, &[1]).expect("button exists");
    let outcome = controller.handle_click(&checkout).expect("storage ok");
    assert_eq!(
        outcome.effects,
        vec![Effect::Navigate("checkout.html".to_string())]
    );
}

#[test]
fn test_add_button_without_price_shows_notice() {
    let page = Element::new("body").with_child(
        Element::new("button")
            .with_attr(attrs::ADD_TO_CART, "true")
            .with_attr(attrs::NAME, "Mystery Box"),
    );
    let mut controller =
        CartController::new(CartStore::new(MemoryStorage::new()), SiteLinks::default());

    let outcome = controller
        .handle_click(&ClickPath::locate(&page, &[0]).expect("button exists"))
        .expect("storage ok");
    assert_eq!(outcome.effects, vec![Effect::Notice(Notice::NeedsPrice)]);
    assert_eq!(controller.views().expect("storage ok").count.count, 0);
}
