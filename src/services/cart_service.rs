use uuid::Uuid;

use crate::{
    cart::{CartSession, LineKey},
    catalog::cache::resolve_menu_view,
    dto::cart::{AddLineRequest, CartView},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let id = state.carts.create().await;
    tracing::debug!(cart_id = %id, "cart created");
    view(state, id, "Cart created").await
}

pub async fn get_cart(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CartView>> {
    view(state, id, "Cart").await
}

/// Add one unit of an item at one of its price points. Works against whatever
/// menu copy customers are browsing, so a cart can be filled while offline.
pub async fn add_line(
    state: &AppState,
    id: Uuid,
    payload: AddLineRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut subscription = state.catalog.subscribe();
    let menu = resolve_menu_view(&mut subscription, state.config.catalog_wait, &state.cache).await;
    let snapshot = &menu.snapshot;

    if !snapshot.settings.order_system {
        return Err(AppError::BadRequest("ordering is currently disabled".into()));
    }
    let item = snapshot
        .item(&payload.item_id)
        .filter(|i| i.visible)
        .filter(|i| snapshot.category(&i.category_id).is_some_and(|c| c.available))
        .ok_or_else(|| AppError::BadRequest("item is not on the menu".into()))?;
    if !item.prices.contains(payload.price) {
        return Err(AppError::BadRequest(format!(
            "{} is not a price of {}",
            payload.price, item.name
        )));
    }

    let cart = state
        .carts
        .with_session(id, |session| {
            session.cart.add_line(item, payload.price);
            CartView::from_session(id, session)
        })
        .await
        .ok_or(AppError::NotFound)?;

    let meta = count_meta(&cart);
    Ok(ApiResponse::success("Added", cart, Some(meta)))
}

pub async fn increase(state: &AppState, id: Uuid, key: String) -> AppResult<ApiResponse<CartView>> {
    let key = LineKey::from(key);
    update(state, id, "Updated", |session| {
        session.cart.increase(&key);
    })
    .await
}

pub async fn decrease(state: &AppState, id: Uuid, key: String) -> AppResult<ApiResponse<CartView>> {
    let key = LineKey::from(key);
    update(state, id, "Updated", |session| {
        session.cart.decrease(&key);
    })
    .await
}

pub async fn remove_line(
    state: &AppState,
    id: Uuid,
    key: String,
) -> AppResult<ApiResponse<CartView>> {
    let key = LineKey::from(key);
    update(state, id, "Removed", |session| {
        session.cart.remove_line(&key);
    })
    .await
}

pub async fn clear(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CartView>> {
    update(state, id, "Cleared", |session| session.cart.clear()).await
}

async fn update(
    state: &AppState,
    id: Uuid,
    message: &str,
    f: impl FnOnce(&mut CartSession),
) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .with_session(id, |session| {
            f(session);
            CartView::from_session(id, session)
        })
        .await
        .ok_or(AppError::NotFound)?;
    let meta = count_meta(&cart);
    Ok(ApiResponse::success(message, cart, Some(meta)))
}

async fn view(state: &AppState, id: Uuid, message: &str) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .with_session(id, |session| CartView::from_session(id, session))
        .await
        .ok_or(AppError::NotFound)?;
    let meta = count_meta(&cart);
    Ok(ApiResponse::success(message, cart, Some(meta)))
}

fn count_meta(cart: &CartView) -> Meta {
    Meta::new(i64::from(cart.total_items))
}
