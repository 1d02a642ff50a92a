//! Integration tests for catalog search.

use smoochiie_storefront::markup::{Element, SiteLinks, attrs, classes};
use smoochiie_storefront::search::{
    CatalogCard, CategoryFilter, SearchEffect, SearchKey, SearchWidget, filter_catalog,
};
use url::Url;

fn card(name_tag: &str, name: &str, category: &str) -> Element {
    Element::new("div")
        .with_class(classes::CARD)
        .with_attr(attrs::CATEGORY, category)
        .with_child(Element::new(name_tag).with_text(name))
}

fn catalog_page() -> Element {
    Element::new("main")
        .with_child(card("h3", "Catnip Toy", "Toys"))
        .with_child(card("h4", "Scratching Post", "Cats"))
        .with_child(card("h3", "Chew Bone", "Dogs"))
}

#[test]
fn test_cat_matches_name_and_category() {
    let cards = CatalogCard::scan(&catalog_page());
    let result = filter_catalog(&cards, "cat", &CategoryFilter::new());

    assert_eq!(result.visible, [true, true, false]);
    assert_eq!(result.first_visible, Some(0));
}

#[test]
fn test_empty_query_shows_all_cards() {
    let cards = CatalogCard::scan(&catalog_page());
    let result = filter_catalog(&cards, "   ", &CategoryFilter::new());
    assert_eq!(result.visible_count(), cards.len());
}

#[test]
fn test_category_boxes_narrow_text_results() {
    let cards = CatalogCard::scan(&catalog_page());
    let filter = CategoryFilter::from_checked(["CATS"]);
    let result = filter_catalog(&cards, "cat", &filter);
    assert_eq!(result.visible, [false, true, false]);
    assert_eq!(result.first_visible, Some(1));
}

#[test]
fn test_search_from_home_page_lands_filtered_on_catalog() {
    let mut home = SearchWidget::new(SiteLinks::default());
    home.open();
    home.input("chew bone");
    let effects = home.key(SearchKey::Enter);
    let [SearchEffect::Navigate(target)] = effects.as_slice() else {
        panic!("expected navigation, got {effects:?}");
    };
    assert_eq!(target, "shop-characters.html?search=chew%20bone");

    let landing = Url::parse("https://smoochiie.test/")
        .and_then(|base| base.join(target))
        .expect("valid url");
    let mut catalog =
        SearchWidget::for_catalog(SiteLinks::default(), CatalogCard::scan(&catalog_page()));
    let effects = catalog.on_load(&landing);

    assert_eq!(
        effects.first(),
        Some(&SearchEffect::SetInput("chew bone".to_string()))
    );
    assert_eq!(
        catalog.result().expect("catalog page").visible,
        [false, false, true]
    );
}
