//! Catalog search command.

use std::path::Path;

use tracing::info;

use smoochiie_storefront::search::{CatalogCard, CategoryFilter, filter_catalog};

/// Filter a catalog export and log the matching cards.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub async fn run(
    catalog: &Path,
    query: &str,
    categories: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(catalog).await?;
    let cards: Vec<CatalogCard> = serde_json::from_str(&content)?;
    info!(cards = cards.len(), path = %catalog.display(), "Loaded catalog");

    let filter = CategoryFilter::from_checked(categories.iter().map(String::as_str));
    let result = filter_catalog(&cards, query, &filter);

    for (card, _) in cards
        .iter()
        .zip(&result.visible)
        .filter(|(_, visible)| **visible)
    {
        info!(category = %card.category, "{}", card.name);
    }

    match result.first_visible.and_then(|index| cards.get(index)) {
        Some(first) => info!(
            matches = result.visible_count(),
            first = %first.name,
            "Search complete"
        ),
        None => info!("No products match"),
    }
    Ok(())
}
