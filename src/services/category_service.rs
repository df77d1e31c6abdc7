use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    catalog::{self, category_from_entity},
    dto::catalog::{CategoryList, CategoryNameRequest, ReorderRequest, ReorderResult},
    entity::categories::{ActiveModel, Column, Entity as Categories},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, now_millis},
    reorder::{OrderUpdate, reorder},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_admin(user)?;
    let items = load_sorted(&state.orm).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::new(total)),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryNameRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;

    // New categories go to the end of the list.
    let count = Categories::find().count(&state.orm).await?;
    let order = i32::try_from(count)
        .map_err(|_| AppError::BadRequest("too many categories".into()))?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name),
        sort_order: Set(order),
        available: Set(true),
        created_at: Set(now_millis()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_create",
        "categories",
        json!({ "category_id": category.id }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn rename_category(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: CategoryNameRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;

    let existing = Categories::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(name);
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_rename",
        "categories",
        json!({ "category_id": category.id, "name": category.name }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_availability(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let available = !existing.available;
    let mut active: ActiveModel = existing.into();
    active.available = Set(available);
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_availability",
        "categories",
        json!({ "category_id": category.id, "available": available }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Deleting a category deletes its items with it.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id.to_string())
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_delete",
        "categories",
        json!({ "category_id": id }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    Ok(ApiResponse::success(
        "Deleted",
        json!({}),
        Some(Meta::empty()),
    ))
}

/// Move one category and rewrite the contiguous `order` of the whole list
/// in a single transaction.
pub async fn reorder_categories(
    state: &AppState,
    user: &AuthUser,
    payload: ReorderRequest,
) -> AppResult<ApiResponse<ReorderResult>> {
    ensure_admin(user)?;
    let current = load_sorted(&state.orm).await?;
    let ids: Vec<String> = current.iter().map(|c| c.id.clone()).collect();

    let updates = match (payload.from, payload.to) {
        (Some(from), Some(to)) => reorder(&ids, from, to),
        _ => None,
    };
    let Some(updates) = updates else {
        let total = current.len() as i64;
        return Ok(ApiResponse::success(
            "Unchanged",
            ReorderResult {
                changed: false,
                updates: Vec::new(),
                categories: current,
            },
            Some(Meta::new(total)),
        ));
    };

    let changed: Vec<&OrderUpdate> = updates
        .iter()
        .filter(|u| {
            current
                .iter()
                .find(|c| c.id == u.category_id)
                .is_none_or(|c| c.order != u.order)
        })
        .collect();

    if let Err(err) = write_orders(&state.orm, &changed).await {
        // The transaction rolled back. Re-sync subscribers from the store
        // instead of patching anything locally.
        tracing::error!(error = %err, "category reorder failed");
        catalog::refresh_after_write(state).await;
        return Err(err.into());
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_reorder",
        "categories",
        json!({ "from": payload.from, "to": payload.to, "written": changed.len() }),
    )
    .await;
    catalog::refresh_after_write(state).await;

    let categories = load_sorted(&state.orm).await?;
    let total = categories.len() as i64;
    Ok(ApiResponse::success(
        "Reordered",
        ReorderResult {
            changed: true,
            updates,
            categories,
        },
        Some(Meta::new(total)),
    ))
}

async fn write_orders(orm: &DatabaseConnection, updates: &[&OrderUpdate]) -> Result<(), DbErr> {
    let txn = orm.begin().await?;
    for update in updates {
        Categories::update_many()
            .col_expr(Column::SortOrder, Expr::value(update.order))
            .filter(Column::Id.eq(update.category_id.as_str()))
            .exec(&txn)
            .await?;
    }
    txn.commit().await
}

pub async fn load_sorted(orm: &DatabaseConnection) -> Result<Vec<Category>, DbErr> {
    Ok(Categories::find()
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect())
}

fn required_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    Ok(name.to_string())
}
