//! Catalog search and category filtering.
//!
//! The catalog page is small enough to filter in place: every product card
//! stays in the page and is shown or hidden by a case-insensitive substring
//! match on its name and category. Category checkboxes narrow the result
//! further.
//!
//! Pages without a catalog hand the query over to the catalog page through
//! its `search` URL parameter; see [`widget`].

pub mod widget;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::markup::{Element, Selector, attrs, classes};

pub use widget::{SEARCH_PARAM, SearchEffect, SearchKey, SearchWidget};

/// Selector for catalog cards.
pub const CARD_SELECTOR: Selector = Selector::Class(classes::CARD);

/// Where a card's name is read from, tried one at a time in this order.
pub const CARD_NAME_FALLBACK: &[Selector] = &[
    Selector::Class(classes::NAME),
    Selector::Tag("h3"),
    Selector::Tag("h4"),
];

/// The searchable part of a catalog card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl CatalogCard {
    #[must_use]
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_owned(),
            category: category.to_owned(),
        }
    }

    /// Read a card from its markup.
    #[must_use]
    pub fn from_element(card: &Element) -> Self {
        let name = CARD_NAME_FALLBACK
            .iter()
            .find_map(|selector| card.query(std::slice::from_ref(selector)))
            .map(|el| el.text_content().trim().to_owned())
            .unwrap_or_default();

        Self {
            name,
            category: card.attr(attrs::CATEGORY).unwrap_or_default().to_owned(),
        }
    }

    /// Every catalog card on a page, in document order.
    #[must_use]
    pub fn scan(page: &Element) -> Vec<Self> {
        page.query_all(&[CARD_SELECTOR])
            .map(Self::from_element)
            .collect()
    }

    fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// Lowercased, trimmed query text.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Checked category boxes. No checked box lets every category through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    checked: BTreeSet<String>,
}

impl CategoryFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the categories of the checked boxes.
    #[must_use]
    pub fn from_checked<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut filter = Self::new();
        for category in categories {
            filter.set(category, true);
        }
        filter
    }

    /// Reflect a checkbox change.
    pub fn set(&mut self, category: &str, checked: bool) {
        let category = normalize_query(category);
        if category.is_empty() {
            return;
        }
        if checked {
            self.checked.insert(category);
        } else {
            self.checked.remove(&category);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Whether a card of `category` passes.
    #[must_use]
    pub fn allows(&self, category: &str) -> bool {
        self.is_empty() || self.checked.contains(&normalize_query(category))
    }
}

/// Visibility of each card after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    /// One flag per card, in card order.
    pub visible: Vec<bool>,
    /// Index of the first visible card; the page scrolls it into view.
    pub first_visible: Option<usize>,
}

impl FilterResult {
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|shown| **shown).count()
    }
}

/// Filter cards by free text and checked categories.
///
/// A card is visible when the normalized query is empty or is a substring of
/// its lowercased name or category, and its category passes `categories`.
#[must_use]
pub fn filter_catalog(
    cards: &[CatalogCard],
    query: &str,
    categories: &CategoryFilter,
) -> FilterResult {
    let needle = normalize_query(query);
    let visible: Vec<bool> = cards
        .iter()
        .map(|card| card.matches_text(&needle) && categories.allows(&card.category))
        .collect();
    let first_visible = visible.iter().position(|shown| *shown);

    FilterResult {
        visible,
        first_visible,
    }
}
