use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    composer::{compose, resolve_destination, validate, whatsapp_link},
    dto::orders::{CheckoutRequest, OrderReceipt},
    error::{AppError, AppResult},
    models::format_amount,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Compose the WhatsApp order for a cart and hand back the link to open.
///
/// Checks run in this order: unknown cart, empty cart, contact form, store
/// connectivity, destination. Any failure leaves the cart as it was.
pub async fn checkout(
    state: &AppState,
    cart_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderReceipt>> {
    let is_empty = state
        .carts
        .with_session(cart_id, |session| session.cart.is_empty())
        .await
        .ok_or(AppError::NotFound)?;
    if is_empty {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let contact = validate(payload.order_type, &payload.form)?;

    let snapshot = state.catalog.live().ok_or_else(|| {
        AppError::Offline("no connection to the menu store, order was not sent".into())
    })?;
    let phone = resolve_destination(&snapshot.settings, payload.order_type)?;

    let now = Utc::now();
    let local = now.with_timezone(&state.config.order_offset());
    let notes = payload.form.notes.as_deref();

    let receipt = state
        .carts
        .with_session(cart_id, |session| {
            if session.cart.is_empty() {
                return None;
            }
            let composed = compose(session.cart.lines(), &contact, notes, local);
            let receipt = OrderReceipt {
                order_type: composed.order_type,
                whatsapp_url: whatsapp_link(&phone, &composed.message),
                message: composed.message,
                total: composed.total,
                total_items: composed.total_items,
                sent_at: now,
            };
            session.cart.clear();
            session.last_order = Some(receipt.clone());
            Some(receipt)
        })
        .await
        .ok_or(AppError::NotFound)?
        .ok_or_else(|| AppError::BadRequest("Cart is empty".into()))?;

    tracing::info!(
        cart_id = %cart_id,
        order_type = %receipt.order_type,
        total = %format_amount(receipt.total),
        items = receipt.total_items,
        "order handed to whatsapp"
    );
    audit::record(
        &state.pool,
        None,
        "order_sent",
        "orders",
        json!({
            "cart_id": cart_id,
            "order_type": receipt.order_type,
            "total": format_amount(receipt.total),
            "items": receipt.total_items,
        }),
    )
    .await;

    let total = i64::from(receipt.total_items);
    Ok(ApiResponse::success(
        "Order ready",
        receipt,
        Some(Meta::with_revision(total, snapshot.revision)),
    ))
}
