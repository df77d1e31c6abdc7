use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    catalog::{self, item_from_entity},
    dto::catalog::{AdminCatalog, AdminCatalogQuery, CreateItemRequest, UpdateItemRequest},
    entity::{
        categories::Entity as Categories,
        items::{ActiveModel, Entity as Items, Model as ItemModel},
    },
    error::{AppError, AppResult},
    menu::admin_listing,
    middleware::auth::{AuthUser, ensure_admin},
    models::{MenuItem, PriceList, now_millis},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// All categories with all their items, read straight from the store.
pub async fn admin_catalog(
    state: &AppState,
    user: &AuthUser,
    query: AdminCatalogQuery,
) -> AppResult<ApiResponse<AdminCatalog>> {
    ensure_admin(user)?;
    let snapshot = catalog::load_snapshot(&state.orm).await?;
    let sections = admin_listing(&snapshot, query.q.as_deref());
    let total = sections.iter().map(|s| s.items.len() as i64).sum();
    Ok(ApiResponse::success(
        "Catalog",
        AdminCatalog { sections },
        Some(Meta::new(total)),
    ))
}

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let prices = PriceList::parse(&payload.price)?;
    ensure_category(state, &payload.category_id).await?;

    let item = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        price: Set(prices.to_string()),
        ingredients: Set(non_blank(payload.ingredients)),
        category_id: Set(payload.category_id),
        visible: Set(true),
        image: Set(non_blank(payload.image)),
        star: Set(payload.star),
        created_at: Set(now_millis()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "item_create",
        "items",
        json!({ "item_id": item.id }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Item created",
        to_domain(item)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = find(state, id).await?;
    let mut active: ActiveModel = existing.into();

    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name.to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(PriceList::parse(&price)?.to_string());
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(state, &category_id).await?;
        active.category_id = Set(category_id);
    }
    if payload.ingredients.is_some() {
        active.ingredients = Set(non_blank(payload.ingredients));
    }
    if payload.image.is_some() {
        active.image = Set(non_blank(payload.image));
    }
    if let Some(star) = payload.star {
        active.star = Set(star);
    }

    let item = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "item_update",
        "items",
        json!({ "item_id": item.id }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Updated",
        to_domain(item)?,
        Some(Meta::empty()),
    ))
}

pub async fn toggle_visibility(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = find(state, id).await?;
    let visible = !existing.visible;
    let mut active: ActiveModel = existing.into();
    active.visible = Set(visible);
    let item = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "item_visibility",
        "items",
        json!({ "item_id": item.id, "visible": visible }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Updated",
        to_domain(item)?,
        Some(Meta::empty()),
    ))
}

pub async fn toggle_star(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = find(state, id).await?;
    let star = !existing.star;
    let mut active: ActiveModel = existing.into();
    active.star = Set(star);
    let item = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "item_star",
        "items",
        json!({ "item_id": item.id, "star": star }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Updated",
        to_domain(item)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Items::delete_by_id(id.to_string()).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "item_delete",
        "items",
        json!({ "item_id": id }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success("Deleted", json!({}), Some(Meta::empty())))
}

async fn find(state: &AppState, id: &str) -> AppResult<ItemModel> {
    Items::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_category(state: &AppState, category_id: &str) -> AppResult<()> {
    Categories::find_by_id(category_id.to_string())
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("category not found".into()))
}

fn to_domain(model: ItemModel) -> AppResult<MenuItem> {
    item_from_entity(model)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("stored item has no valid price")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
