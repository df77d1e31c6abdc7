use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{AddLineRequest, CartView},
        orders::{CheckoutRequest, OrderReceipt},
    },
    error::AppResult,
    response::ApiResponse,
    services::{cart_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route("/{id}", get(get_cart).delete(clear_cart))
        .route("/{id}/lines", post(add_line))
        .route("/{id}/lines/{key}", delete(remove_line))
        .route("/{id}/lines/{key}/increase", post(increase_line))
        .route("/{id}/lines/{key}/decrease", post(decrease_line))
        .route("/{id}/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 201, description = "Empty cart for a new session", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn create_cart(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartView>>)> {
    let resp = cart_service::create_cart(&state).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart id")),
    responses(
        (status = 200, description = "Cart with totals", body = ApiResponse<CartView>),
        (status = 404, description = "Unknown or expired cart")
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/lines",
    params(("id" = Uuid, Path, description = "Cart id")),
    request_body = AddLineRequest,
    responses(
        (status = 200, description = "Line added or incremented", body = ApiResponse<CartView>),
        (status = 400, description = "Ordering disabled, item not on the menu or unknown price"),
        (status = 404, description = "Unknown or expired cart")
    ),
    tag = "Cart"
)]
pub async fn add_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddLineRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_line(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/lines/{key}/increase",
    params(
        ("id" = Uuid, Path, description = "Cart id"),
        ("key" = String, Path, description = "Line key, `<item id>-<price>`")
    ),
    responses(
        (status = 200, description = "Quantity increased; unknown keys are ignored", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn increase_line(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::increase(&state, id, key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/lines/{key}/decrease",
    params(
        ("id" = Uuid, Path, description = "Cart id"),
        ("key" = String, Path, description = "Line key, `<item id>-<price>`")
    ),
    responses(
        (status = 200, description = "Quantity decreased; the line goes away at zero", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn decrease_line(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::decrease(&state, id, key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{id}/lines/{key}",
    params(
        ("id" = Uuid, Path, description = "Cart id"),
        ("key" = String, Path, description = "Line key, `<item id>-<price>`")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn remove_line(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_line(&state, id, key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart id")),
    responses(
        (status = 200, description = "All lines removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/checkout",
    params(("id" = Uuid, Path, description = "Cart id")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order message and WhatsApp link; the cart is emptied", body = ApiResponse<OrderReceipt>),
        (status = 400, description = "Empty cart, or the order channel is closed"),
        (status = 422, description = "Contact form is incomplete"),
        (status = 503, description = "Menu store unreachable, nothing was sent")
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderReceipt>>> {
    let resp = order_service::checkout(&state, id, payload).await?;
    Ok(Json(resp))
}
