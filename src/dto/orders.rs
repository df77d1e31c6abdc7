use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::composer::{OrderForm, OrderType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub order_type: OrderType,
    #[serde(flatten)]
    pub form: OrderForm,
}

/// What was handed to WhatsApp. Delivery is not confirmed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderReceipt {
    pub order_type: OrderType,
    pub message: String,
    pub whatsapp_url: String,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub total_items: u32,
    pub sent_at: DateTime<Utc>,
}
