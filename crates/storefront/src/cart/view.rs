//! View-models for every surface that shows the cart.
//!
//! Each function is a pure projection of a [`Cart`]; the page layer owns the
//! actual markup and replaces a surface's content wholesale with the result.

use serde::Serialize;
use smoochiie_core::{Cart, CartItem, Price};

/// Message shown on the cart page when there is nothing in it.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// The surfaces a cart is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    MiniCart,
    Bag,
    Checkout,
    CartPage,
}

impl Surface {
    /// Edge length in pixels of the square placeholder image.
    #[must_use]
    pub const fn placeholder_size(self) -> u32 {
        match self {
            Self::MiniCart => 60,
            Self::Bag => 120,
            Self::Checkout => 54,
            Self::CartPage => 64,
        }
    }

    /// Placeholder image for lines without one.
    #[must_use]
    pub fn placeholder_image(self) -> String {
        let size = self.placeholder_size();
        format!("https://placehold.co/{size}x{size}")
    }

    /// Whether lines on this surface carry a remove button.
    #[must_use]
    pub const fn has_remove_buttons(self) -> bool {
        !matches!(self, Self::Checkout)
    }
}

/// One cart line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    /// Identity carried by the remove button (`data-id`).
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub unit_price: String,
    pub quantity: u32,
    /// `"$12.99 × 2"`.
    pub label: String,
    pub removable: bool,
}

impl LineView {
    #[must_use]
    pub fn project(item: &CartItem, surface: Surface) -> Self {
        let unit_price = item.price.to_string();
        let image_url = if item.image.is_empty() {
            surface.placeholder_image()
        } else {
            item.image.clone()
        };

        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image_url,
            label: format!("{unit_price} × {}", item.quantity),
            unit_price,
            quantity: item.quantity,
            removable: surface.has_remove_buttons(),
        }
    }
}

fn lines(cart: &Cart, surface: Surface) -> Vec<LineView> {
    cart.items()
        .iter()
        .map(|item| LineView::project(item, surface))
        .collect()
}

/// Cart-count badge next to the cart icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountBadgeView {
    pub count: u32,
}

/// Mini-cart dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiniCartView {
    pub lines: Vec<LineView>,
    pub subtotal: String,
}

/// Bag page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BagView {
    pub lines: Vec<LineView>,
    pub subtotal: String,
    pub total: String,
}

/// Checkout summary. Tax is not calculated and is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub lines: Vec<LineView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

/// Standalone cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CartPageView {
    Empty { message: String },
    Lines { lines: Vec<LineView> },
}

/// Every surface at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartViews {
    pub count: CountBadgeView,
    pub mini_cart: MiniCartView,
    pub bag: BagView,
    pub checkout: CheckoutView,
    pub cart_page: CartPageView,
}

#[must_use]
pub fn render_count(cart: &Cart) -> CountBadgeView {
    CountBadgeView {
        count: cart.count(),
    }
}

#[must_use]
pub fn render_mini_cart(cart: &Cart) -> MiniCartView {
    MiniCartView {
        lines: lines(cart, Surface::MiniCart),
        subtotal: cart.total().to_string(),
    }
}

#[must_use]
pub fn render_bag(cart: &Cart) -> BagView {
    let subtotal = cart.total();
    BagView {
        lines: lines(cart, Surface::Bag),
        subtotal: subtotal.to_string(),
        total: subtotal.to_string(),
    }
}

#[must_use]
pub fn render_checkout(cart: &Cart) -> CheckoutView {
    let subtotal = cart.total();
    let tax = Price::ZERO;
    CheckoutView {
        lines: lines(cart, Surface::Checkout),
        subtotal: subtotal.to_string(),
        tax: tax.to_string(),
        total: (subtotal + tax).to_string(),
    }
}

#[must_use]
pub fn render_cart_page(cart: &Cart) -> CartPageView {
    if cart.is_empty() {
        CartPageView::Empty {
            message: EMPTY_CART_MESSAGE.to_string(),
        }
    } else {
        CartPageView::Lines {
            lines: lines(cart, Surface::CartPage),
        }
    }
}

/// Project the cart onto every surface.
#[must_use]
pub fn render(cart: &Cart) -> CartViews {
    CartViews {
        count: render_count(cart),
        mini_cart: render_mini_cart(cart),
        bag: render_bag(cart),
        checkout: render_checkout(cart),
        cart_page: render_cart_page(cart),
    }
}
