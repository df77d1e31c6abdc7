//! Customer menu: which categories and items are shown, and in what order.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CatalogSnapshot, Category, MenuItem};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MenuQuery {
    /// Case-insensitive search over item name, category name and prices.
    pub q: Option<String>,
    /// Restrict to one category tab.
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

/// Available categories with their visible items, sorted by `order`.
/// Categories left without items are omitted.
pub fn build_menu(snapshot: &CatalogSnapshot, query: &MenuQuery) -> Vec<MenuSection> {
    let needle = normalized_query(query.q.as_deref());

    sorted_categories(snapshot)
        .into_iter()
        .filter(|c| c.available)
        .filter(|c| query.category_id.as_deref().is_none_or(|id| id == c.id))
        .filter_map(|category| {
            let items: Vec<MenuItem> = snapshot
                .items
                .iter()
                .filter(|i| i.category_id == category.id && i.visible)
                .filter(|i| needle.as_deref().is_none_or(|n| matches_search(i, category, n)))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| MenuSection {
                category: category.clone(),
                items,
            })
        })
        .collect()
}

/// Category tabs: available categories that have at least one visible item.
pub fn category_tabs(snapshot: &CatalogSnapshot) -> Vec<Category> {
    build_menu(snapshot, &MenuQuery::default())
        .into_iter()
        .map(|s| s.category)
        .collect()
}

/// Starred, visible items for the featured carousel.
pub fn featured_items(snapshot: &CatalogSnapshot) -> Vec<MenuItem> {
    snapshot
        .items
        .iter()
        .filter(|i| i.star && i.visible)
        .cloned()
        .collect()
}

/// Admin view: every category with every item, hidden ones included.
/// With a query, a category still appears (possibly empty) so it can be edited.
pub fn admin_listing(snapshot: &CatalogSnapshot, q: Option<&str>) -> Vec<MenuSection> {
    let needle = normalized_query(q);
    sorted_categories(snapshot)
        .into_iter()
        .map(|category| MenuSection {
            category: category.clone(),
            items: snapshot
                .items
                .iter()
                .filter(|i| i.category_id == category.id)
                .filter(|i| needle.as_deref().is_none_or(|n| matches_search(i, category, n)))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Stable sort on `order`: ties keep snapshot order.
pub fn sorted_categories(snapshot: &CatalogSnapshot) -> Vec<&Category> {
    let mut categories: Vec<&Category> = snapshot.categories.iter().collect();
    categories.sort_by_key(|c| c.order);
    categories
}

fn normalized_query(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

fn matches_search(item: &MenuItem, category: &Category, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || category.name.to_lowercase().contains(needle)
        || item.prices.mentions(needle)
}
