use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cart::{CartLine, CartSession},
    dto::orders::OrderReceipt,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLineRequest {
    pub item_id: String,
    /// One of the item's price points.
    #[schema(value_type = String)]
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub last_order: Option<OrderReceipt>,
}

impl CartView {
    pub fn from_session(id: Uuid, session: &CartSession) -> Self {
        Self {
            id,
            lines: session.cart.lines().to_vec(),
            total_items: session.cart.total_items(),
            total_price: session.cart.total_price(),
            last_order: session.last_order.clone(),
        }
    }
}
