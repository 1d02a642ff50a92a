//! The header search modal and the catalog's live filter.

use tracing::debug;
use url::Url;

use super::{CatalogCard, CategoryFilter, FilterResult, filter_catalog, normalize_query};
use crate::markup::SiteLinks;

/// URL parameter carrying a query over to the catalog page.
pub const SEARCH_PARAM: &str = "search";

/// Keys the search input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Enter,
    Escape,
    Other,
}

/// Something the page layer must do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// Show the modal and focus the input.
    OpenModal,
    CloseModal,
    /// Put this text in the search input.
    SetInput(String),
    /// Show or hide catalog cards.
    Apply(FilterResult),
    /// Bring the card at this index into view.
    ScrollTo(usize),
    Navigate(String),
}

/// Search state for one page.
///
/// `cards` is `None` on pages that have no catalog grid; there a committed
/// query navigates to the catalog page instead of filtering in place.
#[derive(Debug, Clone)]
pub struct SearchWidget {
    links: SiteLinks,
    cards: Option<Vec<CatalogCard>>,
    categories: CategoryFilter,
    query: String,
    open: bool,
}

impl SearchWidget {
    /// A widget for a page without a catalog.
    #[must_use]
    pub fn new(links: SiteLinks) -> Self {
        Self {
            links,
            cards: None,
            categories: CategoryFilter::new(),
            query: String::new(),
            open: false,
        }
    }

    /// A widget for the catalog page holding `cards`.
    #[must_use]
    pub fn for_catalog(links: SiteLinks, cards: Vec<CatalogCard>) -> Self {
        Self {
            cards: Some(cards),
            ..Self::new(links)
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn is_catalog_page(&self) -> bool {
        self.cards.is_some()
    }

    /// Current visibility of the catalog cards, if this page has any.
    #[must_use]
    pub fn result(&self) -> Option<FilterResult> {
        self.cards
            .as_deref()
            .map(|cards| filter_catalog(cards, &self.query, &self.categories))
    }

    /// Search button clicked.
    pub fn open(&mut self) -> Vec<SearchEffect> {
        self.open = true;
        vec![SearchEffect::OpenModal]
    }

    /// Close button clicked.
    pub fn close(&mut self) -> Vec<SearchEffect> {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        vec![SearchEffect::CloseModal]
    }

    /// Click on the modal. Only a click on the backdrop itself closes it,
    /// not one on the dialog content.
    pub fn modal_click(&mut self, on_backdrop: bool) -> Vec<SearchEffect> {
        if on_backdrop {
            self.close()
        } else {
            Vec::new()
        }
    }

    /// The input text changed.
    pub fn input(&mut self, text: &str) -> Vec<SearchEffect> {
        text.clone_into(&mut self.query);
        self.apply()
    }

    /// A category checkbox changed.
    pub fn toggle_category(&mut self, category: &str, checked: bool) -> Vec<SearchEffect> {
        self.categories.set(category, checked);
        self.apply()
    }

    /// A key was pressed in the search input.
    pub fn key(&mut self, key: SearchKey) -> Vec<SearchEffect> {
        match key {
            SearchKey::Escape => self.close(),
            SearchKey::Enter => self.commit(),
            SearchKey::Other => Vec::new(),
        }
    }

    /// Page load: a catalog page picks up the `search` parameter.
    pub fn on_load(&mut self, page_url: &Url) -> Vec<SearchEffect> {
        if !self.is_catalog_page() {
            return Vec::new();
        }

        let query = page_url
            .query_pairs()
            .find(|(name, _)| name == SEARCH_PARAM)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        if query.trim().is_empty() {
            return Vec::new();
        }

        debug!(query = %query, "Applying search from URL");
        let mut effects = vec![SearchEffect::SetInput(query.clone())];
        effects.extend(self.input(&query));
        effects
    }

    /// Where a committed query sends a page without a catalog.
    #[must_use]
    pub fn catalog_url(&self, query: &str) -> String {
        format!(
            "{}?{SEARCH_PARAM}={}",
            self.links.catalog_page,
            urlencoding::encode(query.trim())
        )
    }

    fn commit(&mut self) -> Vec<SearchEffect> {
        if self.query.trim().is_empty() {
            return Vec::new();
        }

        if self.is_catalog_page() {
            self.close()
        } else {
            vec![SearchEffect::Navigate(self.catalog_url(&self.query))]
        }
    }

    /// Re-filter the catalog. A non-empty query also scrolls to the first hit.
    fn apply(&self) -> Vec<SearchEffect> {
        let Some(result) = self.result() else {
            return Vec::new();
        };
        let scroll = if normalize_query(&self.query).is_empty() {
            None
        } else {
            result.first_visible.map(SearchEffect::ScrollTo)
        };

        let mut effects = vec![SearchEffect::Apply(result)];
        effects.extend(scroll);
        effects
    }
}
