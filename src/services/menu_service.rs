use std::time::Duration;

use crate::{
    catalog::cache::resolve_menu_view,
    dto::menu::{FeaturedList, MenuResponse},
    error::AppResult,
    menu::{MenuQuery, build_menu, category_tabs, featured_items},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Upper bound on a single long-poll for catalog changes.
pub const CHANGES_POLL: Duration = Duration::from_secs(25);

pub async fn get_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuResponse>> {
    let mut subscription = state.catalog.subscribe();
    let view = resolve_menu_view(&mut subscription, state.config.catalog_wait, &state.cache).await;
    let snapshot = &view.snapshot;

    let sections = build_menu(snapshot, &query);
    let total = sections.iter().map(|s| s.items.len() as i64).sum();
    let data = MenuResponse {
        source: view.source,
        revision: snapshot.revision,
        order_system: snapshot.settings.order_system,
        tabs: category_tabs(snapshot),
        sections,
        footer: snapshot.settings.footer.clone(),
    };

    Ok(ApiResponse::success(
        "Menu",
        data,
        Some(Meta::with_revision(total, snapshot.revision)),
    ))
}

pub async fn featured(state: &AppState) -> AppResult<ApiResponse<FeaturedList>> {
    let mut subscription = state.catalog.subscribe();
    let view = resolve_menu_view(&mut subscription, state.config.catalog_wait, &state.cache).await;

    let items = featured_items(&view.snapshot);
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Featured",
        FeaturedList { items },
        Some(Meta::with_revision(total, view.snapshot.revision)),
    ))
}

/// Long-poll: answers with the menu as soon as a revision newer than `since`
/// is published, or with `None` when nothing changed within `wait`.
pub async fn changes(
    state: &AppState,
    since: u64,
    query: MenuQuery,
    wait: Duration,
) -> AppResult<Option<ApiResponse<MenuResponse>>> {
    let mut subscription = state.catalog.subscribe();
    match tokio::time::timeout(wait, subscription.newer_than(since)).await {
        Ok(Some(_)) => get_menu(state, query).await.map(Some),
        Ok(None) | Err(_) => Ok(None),
    }
}
