//! Click classification for the cart widgets.
//!
//! A single document-level click handler serves every cart control. Which
//! control was hit is decided by [`DISPATCH_TABLE`], checked top to bottom;
//! the first rule whose selectors match an element on the click path and
//! whose guard accepts that element wins.

use smoochiie_core::CartItemId;

use super::product::ProductDetails;
use crate::markup::{ClickPath, Element, Selector, attrs, classes, ids};

/// The role an element plays for the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    RemoveButton,
    ClearCart,
    AddToCart,
    CheckoutButton,
    CartIcon,
}

/// Extra condition on the matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// The element carries this (non-empty) attribute.
    HasAttr(&'static str),
    /// The element's trimmed, lowercased text contains this word.
    TextContains(&'static str),
    /// The click did not land inside the element with this id.
    NotWithinId(&'static str),
}

impl Guard {
    fn accepts(self, element: &Element, path: &ClickPath) -> bool {
        match self {
            Self::Always => true,
            Self::HasAttr(name) => element.attr(name).is_some(),
            Self::TextContains(word) => element
                .text_content()
                .trim()
                .to_lowercase()
                .contains(word),
            Self::NotWithinId(id) => !path.is_within_id(id),
        }
    }
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: Role,
    pub selectors: &'static [Selector],
    pub guard: Guard,
    /// Whether the browser's default action is suppressed on a match.
    pub prevents_default: bool,
}

/// Rules in priority order.
///
/// Remove, clear and add come before anything that could close the mini-cart
/// so that those controls keep working from inside the dropdown.
pub const DISPATCH_TABLE: &[RoleRule] = &[
    RoleRule {
        role: Role::RemoveButton,
        selectors: &[
            Selector::Class(classes::REMOVE_BUTTON),
            Selector::Class(classes::REMOVE_MINI),
        ],
        guard: Guard::HasAttr(attrs::ID),
        prevents_default: true,
    },
    RoleRule {
        role: Role::ClearCart,
        selectors: &[
            Selector::Class(classes::CONTINUE_SHOPPING),
            Selector::Id(ids::CLEAR_BAG),
            Selector::Id(ids::CLEAR_CART),
        ],
        guard: Guard::TextContains("clear"),
        prevents_default: true,
    },
    RoleRule {
        role: Role::AddToCart,
        selectors: &[
            Selector::Class(classes::ADD_BUTTON),
            Selector::Class(classes::ADD_TO_CART_BUTTON),
            Selector::Attr(attrs::ADD_TO_CART),
        ],
        guard: Guard::Always,
        prevents_default: true,
    },
    RoleRule {
        role: Role::CheckoutButton,
        selectors: &[Selector::Id(ids::CHECKOUT_BUTTON)],
        guard: Guard::Always,
        prevents_default: true,
    },
    RoleRule {
        role: Role::CartIcon,
        selectors: &[Selector::Id(ids::CART_ICON_CONTAINER)],
        guard: Guard::NotWithinId(ids::MINI_CART),
        prevents_default: false,
    },
];

/// What a click asks the cart to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Remove(CartItemId),
    Clear,
    Add(ProductDetails),
    Checkout,
    ToggleMiniCart,
    /// Click outside the dropdown and the cart icon.
    Outside,
    /// Click inside the dropdown on nothing in particular.
    Inside,
}

/// A classified click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub intent: Intent,
    pub role: Option<Role>,
    pub prevent_default: bool,
}

/// Classify a click using [`DISPATCH_TABLE`].
#[must_use]
pub fn classify(path: &ClickPath) -> Dispatch {
    for rule in DISPATCH_TABLE {
        let Some(depth) = path.closest_depth(rule.selectors) else {
            continue;
        };
        let Some(element) = path.ancestors_from(depth).next() else {
            continue;
        };
        if !rule.guard.accepts(element, path) {
            continue;
        }

        let intent = match rule.role {
            Role::RemoveButton => {
                Intent::Remove(CartItemId::from(element.attr(attrs::ID).unwrap_or_default()))
            }
            Role::ClearCart => Intent::Clear,
            Role::AddToCart => Intent::Add(ProductDetails::from_click(path, depth)),
            Role::CheckoutButton => Intent::Checkout,
            Role::CartIcon => Intent::ToggleMiniCart,
        };

        return Dispatch {
            intent,
            role: Some(rule.role),
            prevent_default: rule.prevents_default,
        };
    }

    let intent = if path.is_within_id(ids::MINI_CART) || path.is_within_id(ids::CART_ICON_CONTAINER)
    {
        Intent::Inside
    } else {
        Intent::Outside
    };

    Dispatch {
        intent,
        role: None,
        prevent_default: false,
    }
}
