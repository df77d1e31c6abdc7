use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::{
    dto::{
        catalog::{
            AdminCatalog, AdminCatalogQuery, CategoryList, CategoryNameRequest,
            CreateItemRequest, ReorderRequest, ReorderResult, UpdateItemRequest,
        },
        settings::UpdateSettingsRequest,
        uploads::{ImageUploadForm, UploadedImage},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Category, MenuItem, SiteSettings},
    response::ApiResponse,
    services::{category_service, item_service, settings_service, upload_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(admin_catalog))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/reorder", post(reorder_categories))
        .route(
            "/categories/{id}",
            patch(rename_category).delete(delete_category),
        )
        .route("/categories/{id}/availability", post(toggle_availability))
        .route("/items", post(create_item))
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .route("/items/{id}/visibility", post(toggle_visibility))
        .route("/items/{id}/star", post(toggle_star))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/images", post(upload_image))
        .route("/images/featured", get(featured_images))
}

#[utoipa::path(
    get,
    path = "/api/admin/catalog",
    params(("q" = Option<String>, Query, description = "Search item name, category name or price")),
    responses(
        (status = 200, description = "Every category with every item, hidden ones included", body = ApiResponse<AdminCatalog>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_catalog(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminCatalogQuery>,
) -> AppResult<Json<ApiResponse<AdminCatalog>>> {
    let resp = item_service::admin_catalog(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories sorted by order", body = ApiResponse<CategoryList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryNameRequest,
    responses(
        (status = 201, description = "Category appended to the end of the list", body = ApiResponse<Category>),
        (status = 400, description = "Empty name")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryNameRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = CategoryNameRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn rename_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryNameRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::rename_category(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories/{id}/availability",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Availability flipped", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::toggle_availability(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category and its items deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = category_service::delete_category(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "New order written, or unchanged for a no-op drop", body = ApiResponse<ReorderResult>),
        (status = 500, description = "Write failed and was rolled back")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reorder_categories(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<Json<ApiResponse<ReorderResult>>> {
    let resp = category_service::reorder_categories(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Missing name, bad price or unknown category")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    let resp = item_service::create_item(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<MenuItem>),
        (status = 400, description = "Bad price or unknown category"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = item_service::update_item(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/items/{id}/visibility",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Visibility flipped", body = ApiResponse<MenuItem>),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_visibility(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = item_service::toggle_visibility(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/items/{id}/star",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Featured flag flipped", body = ApiResponse<MenuItem>),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_star(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = item_service::toggle_star(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = item_service::delete_item(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "All site settings, phone numbers included", body = ApiResponse<SiteSettings>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SiteSettings>>> {
    let resp = settings_service::admin_settings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings after the update", body = ApiResponse<SiteSettings>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<SiteSettings>>> {
    let resp = settings_service::update_settings(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/images",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing field or not an image")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadedImage>>)> {
    let resp = upload_service::upload_image(&state, &user, multipart).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/images/featured",
    responses(
        (status = 200, description = "Preset item pictures", body = ApiResponse<Vec<UploadedImage>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn featured_images(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<UploadedImage>>>> {
    let resp = upload_service::featured_images(&state, &user).await?;
    Ok(Json(resp))
}
