//! The cart controller: turns page events into cart mutations and UI effects.

use core::fmt;

use tracing::{debug, info};

use super::intent::{Intent, Role, classify};
use super::product::ProductDetails;
use super::storage::CartStorage;
use super::store::{AddOutcome, CartError, CartStore};
use super::view::{CartViews, render};
use crate::markup::{ClickPath, SiteLinks};

/// Transient message shown in the cart toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NeedsPrice,
    AddedToBag,
    CartCleared,
    BagEmpty,
}

impl Notice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NeedsPrice => "This item needs a price",
            Self::AddedToBag => "Added to bag",
            Self::CartCleared => "Cart cleared",
            Self::BagEmpty => "Bag is empty",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Something the page layer must do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace every cart surface with these views.
    Render(Box<CartViews>),
    Notice(Notice),
    OpenMiniCart,
    CloseMiniCart,
    Navigate(String),
}

/// Result of handling a click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub role: Option<Role>,
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

/// Owns the cart store and the mini-cart open state for one page.
#[derive(Debug)]
pub struct CartController<S> {
    store: CartStore<S>,
    links: SiteLinks,
    mini_cart_open: bool,
}

impl<S: CartStorage> CartController<S> {
    pub const fn new(store: CartStore<S>, links: SiteLinks) -> Self {
        Self {
            store,
            links,
            mini_cart_open: false,
        }
    }

    pub fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    pub const fn is_mini_cart_open(&self) -> bool {
        self.mini_cart_open
    }

    /// Page load: the dropdown starts closed and every surface is drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read from storage.
    pub fn init(&mut self) -> Result<Vec<Effect>, CartError> {
        self.mini_cart_open = false;
        Ok(vec![Effect::CloseMiniCart, self.render_effect()?])
    }

    /// Current views of every surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read from storage.
    pub fn views(&mut self) -> Result<CartViews, CartError> {
        Ok(render(self.store.cart()?))
    }

    /// Open the dropdown if closed, close it if open.
    pub fn toggle_mini_cart(&mut self) -> Effect {
        self.mini_cart_open = !self.mini_cart_open;
        if self.mini_cart_open {
            Effect::OpenMiniCart
        } else {
            Effect::CloseMiniCart
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear_cart(&mut self) -> Result<Vec<Effect>, CartError> {
        self.store.clear()?;
        info!("Cart cleared");
        Ok(vec![self.render_effect()?, Effect::Notice(Notice::CartCleared)])
    }

    /// Storage changed in another tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be re-read.
    pub fn on_storage_event(&mut self, key: Option<&str>) -> Result<Vec<Effect>, CartError> {
        if self.store.on_storage_change(key) {
            debug!("Cart changed in another context, re-rendering");
            Ok(vec![self.render_effect()?])
        } else {
            Ok(Vec::new())
        }
    }

    /// Handle a click anywhere in the document.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn handle_click(&mut self, path: &ClickPath) -> Result<ClickOutcome, CartError> {
        let dispatch = classify(path);
        let effects = match dispatch.intent {
            Intent::Remove(id) => {
                self.store.remove(&id)?;
                vec![self.render_effect()?]
            }
            Intent::Clear => self.clear_cart()?,
            Intent::Add(details) => self.add(&details)?,
            Intent::Checkout => {
                if self.store.reload()?.is_empty() {
                    vec![Effect::Notice(Notice::BagEmpty)]
                } else {
                    vec![Effect::Navigate(self.links.checkout_page.clone())]
                }
            }
            Intent::ToggleMiniCart => vec![self.toggle_mini_cart()],
            Intent::Outside if self.mini_cart_open => {
                self.mini_cart_open = false;
                vec![Effect::CloseMiniCart]
            }
            Intent::Outside | Intent::Inside => Vec::new(),
        };

        Ok(ClickOutcome {
            role: dispatch.role,
            prevent_default: dispatch.prevent_default,
            effects,
        })
    }

    fn add(&mut self, details: &ProductDetails) -> Result<Vec<Effect>, CartError> {
        let outcome = self.store.add(
            details.name.as_deref(),
            details.price.as_deref(),
            details.image.as_deref(),
        )?;

        match outcome {
            AddOutcome::Added { .. } => {
                self.mini_cart_open = true;
                Ok(vec![
                    self.render_effect()?,
                    Effect::OpenMiniCart,
                    Effect::Notice(Notice::AddedToBag),
                ])
            }
            AddOutcome::Rejected(reason) => {
                debug!(?reason, "Add to cart rejected");
                Ok(vec![Effect::Notice(Notice::NeedsPrice)])
            }
        }
    }

    fn render_effect(&mut self) -> Result<Effect, CartError> {
        Ok(Effect::Render(Box::new(self.views()?)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::storage::{CART_KEY, MemoryStorage};
    use crate::markup::{Element, attrs, classes, ids};

    fn controller(storage: MemoryStorage) -> CartController<MemoryStorage> {
        CartController::new(CartStore::new(storage), SiteLinks::default())
    }

    fn add_button(price: &str) -> Element {
        Element::new("button")
            .with_class(classes::ADD_BUTTON)
            .with_attr(attrs::NAME, "Plush")
            .with_attr(attrs::PRICE, price)
    }

    fn page(price: &str) -> Element {
        Element::new("body")
            .with_child(
                Element::new("div")
                    .with_id(ids::CART_ICON_CONTAINER)
                    .with_child(Element::new("div").with_id(ids::MINI_CART)),
            )
            .with_child(add_button(price))
            .with_child(Element::new("button").with_id(ids::CHECKOUT_BUTTON))
            .with_child(Element::new("p"))
            .with_child(
                Element::new("button")
                    .with_id(ids::CLEAR_BAG)
                    .with_text("Clear bag"),
            )
    }

    fn click(
        controller: &mut CartController<MemoryStorage>,
        root: &Element,
        route: &[usize],
    ) -> ClickOutcome {
        controller
            .handle_click(&ClickPath::locate(root, route).unwrap())
            .unwrap()
    }

    fn rendered_count(outcome: &ClickOutcome) -> Option<u32> {
        outcome.effects.iter().find_map(|effect| match effect {
            Effect::Render(views) => Some(views.count.count),
            _ => None,
        })
    }

    #[test]
    fn test_add_opens_dropdown_and_notifies() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        let outcome = click(&mut ctl, &root, &[1]);
        assert!(outcome.prevent_default);
        assert_eq!(rendered_count(&outcome), Some(1));
        assert!(outcome.effects.contains(&Effect::OpenMiniCart));
        assert!(outcome.effects.contains(&Effect::Notice(Notice::AddedToBag)));
        assert!(ctl.is_mini_cart_open());
    }

    #[test]
    fn test_add_without_price_shows_notice_only() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("ask");
        let outcome = click(&mut ctl, &root, &[1]);
        assert_eq!(outcome.effects, vec![Effect::Notice(Notice::NeedsPrice)]);
        assert!(ctl.store_mut().cart().unwrap().is_empty());
        assert!(!ctl.is_mini_cart_open());
    }

    #[test]
    fn test_checkout_requires_items() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        let outcome = click(&mut ctl, &root, &[2]);
        assert_eq!(outcome.effects, vec![Effect::Notice(Notice::BagEmpty)]);

        click(&mut ctl, &root, &[1]);
        let outcome = click(&mut ctl, &root, &[2]);
        assert_eq!(
            outcome.effects,
            vec![Effect::Navigate("checkout.html".to_string())]
        );
    }

    #[test]
    fn test_checkout_sees_items_added_in_another_tab() {
        let shared = MemoryStorage::new();
        let mut tab_a = controller(shared.clone());
        let mut tab_b = controller(shared);
        let root = page("$5");
        tab_a.init().unwrap();

        click(&mut tab_b, &root, &[1]);
        // no storage event delivered to tab A yet
        let outcome = click(&mut tab_a, &root, &[2]);
        assert_eq!(
            outcome.effects,
            vec![Effect::Navigate("checkout.html".to_string())]
        );
    }

    #[test]
    fn test_clear_click_keeps_dropdown_open() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        click(&mut ctl, &root, &[1]);
        assert!(ctl.is_mini_cart_open());

        let outcome = click(&mut ctl, &root, &[4]);
        assert!(outcome.prevent_default);
        assert_eq!(rendered_count(&outcome), Some(0));
        assert!(outcome.effects.contains(&Effect::Notice(Notice::CartCleared)));
        assert!(!outcome.effects.contains(&Effect::CloseMiniCart));
        assert!(ctl.is_mini_cart_open());
    }

    #[test]
    fn test_checkout_click_keeps_dropdown_open() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        click(&mut ctl, &root, &[0]);
        assert!(ctl.is_mini_cart_open());

        // empty bag: notice only
        let outcome = click(&mut ctl, &root, &[2]);
        assert!(outcome.prevent_default);
        assert_eq!(outcome.effects, vec![Effect::Notice(Notice::BagEmpty)]);
        assert!(ctl.is_mini_cart_open());

        click(&mut ctl, &root, &[1]);
        let outcome = click(&mut ctl, &root, &[2]);
        assert!(!outcome.effects.contains(&Effect::CloseMiniCart));
        assert!(ctl.is_mini_cart_open());
    }

    #[test]
    fn test_outside_click_closes_open_dropdown() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        assert_eq!(click(&mut ctl, &root, &[3]).effects, Vec::new());

        click(&mut ctl, &root, &[0]);
        assert!(ctl.is_mini_cart_open());
        // inside the dropdown: stays open
        assert_eq!(click(&mut ctl, &root, &[0, 0]).effects, Vec::new());
        assert!(ctl.is_mini_cart_open());

        let outcome = click(&mut ctl, &root, &[3]);
        assert_eq!(outcome.effects, vec![Effect::CloseMiniCart]);
        assert!(!ctl.is_mini_cart_open());
    }

    #[test]
    fn test_icon_toggles() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        assert_eq!(click(&mut ctl, &root, &[0]).effects, vec![Effect::OpenMiniCart]);
        assert_eq!(click(&mut ctl, &root, &[0]).effects, vec![Effect::CloseMiniCart]);
    }

    #[test]
    fn test_init_closes_and_renders() {
        let mut ctl = controller(MemoryStorage::new());
        ctl.toggle_mini_cart();
        let effects = ctl.init().unwrap();
        assert_eq!(effects.first(), Some(&Effect::CloseMiniCart));
        assert!(matches!(effects.get(1), Some(Effect::Render(_))));
        assert!(!ctl.is_mini_cart_open());
    }

    #[test]
    fn test_clear_and_storage_events() {
        let shared = MemoryStorage::new();
        let mut tab_a = controller(shared.clone());
        let mut tab_b = controller(shared);
        let root = page("$5");

        click(&mut tab_a, &root, &[1]);
        assert!(tab_b.on_storage_event(Some("other")).unwrap().is_empty());

        let effects = tab_b.on_storage_event(Some(CART_KEY)).unwrap();
        assert!(matches!(effects.as_slice(), [Effect::Render(views)] if views.count.count == 1));

        let effects = tab_b.clear_cart().unwrap();
        assert!(effects.contains(&Effect::Notice(Notice::CartCleared)));
        tab_a.on_storage_event(Some(CART_KEY)).unwrap();
        assert_eq!(tab_a.views().unwrap().count.count, 0);
    }

    #[test]
    fn test_remove_via_rendered_id() {
        let mut ctl = controller(MemoryStorage::new());
        let root = page("$5");
        click(&mut ctl, &root, &[1]);
        let id = ctl.views().unwrap().mini_cart.lines[0].id.clone();

        let dropdown = Element::new("body").with_child(
            Element::new("div").with_id(ids::MINI_CART).with_child(
                Element::new("button")
                    .with_class(classes::REMOVE_MINI)
                    .with_attr(attrs::ID, &id),
            ),
        );
        let outcome = click(&mut ctl, &dropdown, &[0, 0]);
        assert_eq!(rendered_count(&outcome), Some(0));
        // removal from inside the dropdown does not close it
        assert!(!outcome.effects.contains(&Effect::CloseMiniCart));
        assert!(ctl.is_mini_cart_open());
    }
}
