pub mod cache;
pub mod decode;
pub mod feed;

use std::time::Duration;

use sea_orm::{DbErr, EntityTrait, QueryOrder};
use serde_json::{Map, Value};

use crate::{
    entity::{
        categories::{self, Entity as Categories},
        items::{self, Entity as Items},
        settings::Entity as Settings,
    },
    error::AppResult,
    models::{CatalogSnapshot, Category, MenuItem, PriceList},
    state::AppState,
};

pub fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        order: model.sort_order,
        available: model.available,
        created_at: model.created_at,
    }
}

/// `None` when the stored price string has no usable price point.
pub fn item_from_entity(model: items::Model) -> Option<MenuItem> {
    let prices = match PriceList::parse_lenient(&model.price) {
        Ok(prices) => prices,
        Err(err) => {
            tracing::warn!(item_id = %model.id, error = %err, "skipping item with unusable price");
            return None;
        }
    };
    Some(MenuItem {
        id: model.id,
        name: model.name,
        ingredients: model.ingredients.filter(|s| !s.trim().is_empty()),
        prices,
        category_id: model.category_id,
        visible: model.visible,
        image: model.image.filter(|s| !s.trim().is_empty()),
        star: model.star,
        created_at: model.created_at,
    })
}

/// Read categories, items and settings from the store.
pub async fn load_snapshot(orm: &sea_orm::DatabaseConnection) -> Result<CatalogSnapshot, DbErr> {
    let categories = Categories::find()
        .order_by_asc(categories::Column::SortOrder)
        .order_by_asc(categories::Column::CreatedAt)
        .all(orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    let items = Items::find()
        .order_by_asc(items::Column::CreatedAt)
        .order_by_asc(items::Column::Id)
        .all(orm)
        .await?
        .into_iter()
        .filter_map(item_from_entity)
        .collect();

    let settings: Map<String, Value> = Settings::find()
        .all(orm)
        .await?
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect();

    Ok(CatalogSnapshot {
        revision: 0,
        categories,
        items,
        settings: decode::decode_settings(Some(&Value::Object(settings))),
    })
}

/// Re-read the store and push the result to subscribers and the local cache.
/// A failed read takes the feed offline.
pub async fn refresh(state: &AppState) -> AppResult<u64> {
    let snapshot = match load_snapshot(&state.orm).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            if state.catalog.mark_offline() {
                tracing::warn!(error = %err, "catalog store unreachable, going offline");
            }
            return Err(err.into());
        }
    };
    let revision = state.catalog.publish(snapshot);
    if let Some(published) = state.catalog.current() {
        state.cache.store_detached(published);
    }
    Ok(revision)
}

/// Refresh after a write. The write already succeeded, so a failed reload
/// only delays what subscribers see; the loader keeps retrying.
pub async fn refresh_after_write(state: &AppState) {
    if let Err(err) = refresh(state).await {
        tracing::warn!(error = %err, "catalog refresh after write failed");
        spawn_loader(state.clone());
    }
}

/// Keep trying to load a snapshot in the background until one is published.
/// At most one loader runs per feed.
pub fn spawn_loader(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !state.catalog.begin_loading() {
            return;
        }
        let mut delay = Duration::from_millis(500);
        loop {
            match refresh(&state).await {
                Ok(revision) => {
                    tracing::info!(revision, "catalog loaded");
                    state.catalog.end_loading();
                    return;
                }
                Err(err) => {
                    tracing::warn!(error = %err, retry_in_ms = %delay.as_millis(), "catalog load failed");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(30));
                }
            }
        }
    })
}
