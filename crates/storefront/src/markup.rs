//! The page-markup contract.
//!
//! The cart and search widgets are bound to a fixed set of element ids and
//! class names owned by the page templates. This module names that contract
//! and provides a minimal element tree so click handling and catalog scanning
//! can be driven (and tested) without a browser.

use std::collections::BTreeMap;

/// Element ids the widgets look up.
pub mod ids {
    pub const MINI_CART: &str = "mini-cart";
    pub const MINI_CART_ITEMS: &str = "mini-cart-items";
    pub const MINI_CART_SUBTOTAL: &str = "mini-cart-subtotal";
    pub const CART_ICON_CONTAINER: &str = "cart-icon-container";
    pub const CART_COUNT: &str = "cart-count";
    pub const CART_TOAST: &str = "cart-toast";

    pub const BAG_LIST: &str = "cart-list";
    pub const BAG_SUBTOTAL: &str = "summary-subtotal";
    pub const BAG_TOTAL: &str = "summary-total";
    pub const CLEAR_BAG: &str = "clear-bag";
    pub const CLEAR_CART: &str = "clear-cart";
    pub const CHECKOUT_BUTTON: &str = "checkout-btn";

    pub const CHECKOUT_ITEMS: &str = "checkout-items";
    pub const CHECKOUT_SUBTOTAL: &str = "subtotal";
    pub const CHECKOUT_TAX: &str = "tax";
    pub const CHECKOUT_TOTAL: &str = "total";

    pub const CART_PAGE_ROOT: &str = "cart-root";

    pub const SEARCH_BUTTON: &str = "search-btn";
    pub const SEARCH_MODAL: &str = "search-modal";
    pub const SEARCH_CLOSE: &str = "close-search";
    pub const SEARCH_INPUT: &str = "search-input";
}

/// Class names the widgets match on.
pub mod classes {
    pub const REMOVE_BUTTON: &str = "remove-btn";
    pub const REMOVE_MINI: &str = "remove-mini";
    pub const CONTINUE_SHOPPING: &str = "continue-shopping";
    pub const ADD_BUTTON: &str = "add-btn";
    pub const ADD_TO_CART_BUTTON: &str = "add-to-cart-btn";
    pub const CARD: &str = "card";
    pub const PRODUCT_CARD: &str = "product-card";
    pub const PRODUCT: &str = "product";
    pub const ITEM: &str = "item";
    pub const GRID_ITEM: &str = "grid-item";
    pub const NAME: &str = "name";
    pub const TITLE: &str = "title";
    pub const PRICE: &str = "price";
    pub const AMOUNT: &str = "amount";
}

/// Data attributes the widgets read.
pub mod attrs {
    pub const ID: &str = "data-id";
    pub const NAME: &str = "data-name";
    pub const PRICE: &str = "data-price";
    pub const IMAGE: &str = "data-image";
    pub const ADD_TO_CART: &str = "data-add-to-cart";
    pub const CATEGORY: &str = "data-category";
    pub const SRC: &str = "src";
}

/// Pages the widgets navigate between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    /// Checkout page, opened from the bag.
    pub checkout_page: String,
    /// Catalog page that understands the `search` query parameter.
    pub catalog_page: String,
}

impl Default for SiteLinks {
    fn default() -> Self {
        Self {
            checkout_page: "checkout.html".to_string(),
            catalog_page: "shop-characters.html".to_string(),
        }
    }
}

/// A simple CSS selector: one tag, id, class or attribute-presence test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Tag(&'static str),
    Id(&'static str),
    Class(&'static str),
    Attr(&'static str),
}

impl Selector {
    /// Whether `element` matches this selector.
    #[must_use]
    pub fn matches(self, element: &Element) -> bool {
        match self {
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id.as_deref() == Some(id),
            Self::Class(class) => element.has_class(class),
            Self::Attr(name) => element.attributes.contains_key(name),
        }
    }

    /// Whether `element` matches any selector of a selector list.
    #[must_use]
    pub fn any(list: &[Self], element: &Element) -> bool {
        list.iter().any(|selector| selector.matches(element))
    }
}

/// A node of page markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Text directly inside this element (children's text excluded).
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag name.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value, treating an empty value as absent.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Concatenated text of this element and all its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Descendants in document order (the element itself excluded).
    pub fn descendants(&self) -> impl Iterator<Item = &Self> {
        let mut stack: Vec<&Self> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// First descendant matching any selector in `list`, like `querySelector`.
    #[must_use]
    pub fn query(&self, list: &[Selector]) -> Option<&Self> {
        self.descendants()
            .find(|element| Selector::any(list, element))
    }

    /// All descendants matching any selector in `list`.
    pub fn query_all<'a>(&'a self, list: &'a [Selector]) -> impl Iterator<Item = &'a Self> {
        self.descendants()
            .filter(move |element| Selector::any(list, element))
    }
}

/// The clicked element followed by its ancestors up to the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickPath {
    elements: Vec<Element>,
}

impl ClickPath {
    /// Build a path from the target outwards.
    #[must_use]
    pub const fn new(target_then_ancestors: Vec<Element>) -> Self {
        Self {
            elements: target_then_ancestors,
        }
    }

    /// Locate a target inside `root` by walking child indices.
    ///
    /// Returns `None` if an index is out of range.
    #[must_use]
    pub fn locate(root: &Element, route: &[usize]) -> Option<Self> {
        let mut chain = vec![root];
        let mut current = root;
        for &index in route {
            current = current.children.get(index)?;
            chain.push(current);
        }
        Some(Self {
            elements: chain.into_iter().rev().cloned().collect(),
        })
    }

    /// Depth (0 = target) of the nearest element matching any selector.
    #[must_use]
    pub fn closest_depth(&self, list: &[Selector]) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| Selector::any(list, element))
    }

    /// The element at `depth` and everything above it.
    pub fn ancestors_from(&self, depth: usize) -> impl Iterator<Item = &Element> {
        self.elements.iter().skip(depth)
    }

    /// Whether the click landed inside the element with the given id.
    #[must_use]
    pub fn is_within_id(&self, id: &str) -> bool {
        self.elements
            .iter()
            .any(|element| element.id.as_deref() == Some(id))
    }
}
