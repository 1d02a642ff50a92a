//! Reading product details off an add-to-cart button and its card.

use crate::markup::{ClickPath, Element, Selector, attrs, classes};

/// Containers treated as a product card.
pub const CARD_SELECTORS: &[Selector] = &[
    Selector::Class(classes::CARD),
    Selector::Class(classes::PRODUCT_CARD),
    Selector::Class(classes::PRODUCT),
    Selector::Class(classes::ITEM),
    Selector::Class(classes::GRID_ITEM),
];

/// Elements inside a card holding the product name.
pub const CARD_NAME_SELECTORS: &[Selector] = &[
    Selector::Class(classes::NAME),
    Selector::Class(classes::TITLE),
    Selector::Tag("h3"),
    Selector::Tag("h2"),
];

/// Elements inside a card holding the price.
pub const CARD_PRICE_SELECTORS: &[Selector] = &[
    Selector::Class(classes::PRICE),
    Selector::Class(classes::AMOUNT),
    Selector::Attr(attrs::PRICE),
];

/// Raw product values as found in the markup, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

impl ProductDetails {
    /// Read details for the add button found at `button_depth` in `path`.
    ///
    /// The button's own `data-name`, `data-price` and `data-image` win. When
    /// the name or price is missing, the nearest enclosing card fills in
    /// whatever is still missing.
    #[must_use]
    pub fn from_click(path: &ClickPath, button_depth: usize) -> Self {
        let Some(button) = path.ancestors_from(button_depth).next() else {
            return Self::default();
        };

        let mut details = Self {
            name: button.attr(attrs::NAME).map(str::to_owned),
            price: button.attr(attrs::PRICE).map(str::to_owned),
            image: button.attr(attrs::IMAGE).map(str::to_owned),
        };

        if details.name.is_none() || details.price.is_none() {
            let card = path
                .ancestors_from(button_depth)
                .find(|element| Selector::any(CARD_SELECTORS, element));
            if let Some(card) = card {
                details.fill_from_card(card);
            }
        }

        details
    }

    fn fill_from_card(&mut self, card: &Element) {
        if self.name.is_none() {
            self.name = card
                .query(CARD_NAME_SELECTORS)
                .map(|el| el.text_content().trim().to_owned());
        }
        if self.price.is_none() {
            self.price = card
                .query(CARD_PRICE_SELECTORS)
                .map(|el| el.attr(attrs::PRICE).map_or_else(|| el.text_content(), str::to_owned));
        }
        if self.image.is_none() {
            self.image = card
                .query(&[Selector::Tag("img")])
                .and_then(|img| img.attr(attrs::SRC))
                .map(str::to_owned);
        }
    }
}
