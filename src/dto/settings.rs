use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{FooterInfo, OrderSettings};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub order_system: Option<bool>,
    pub order_settings: Option<OrderSettings>,
    pub complaints_whatsapp: Option<String>,
    pub footer: Option<FooterInfo>,
}

/// Settings visible to customers. Phone numbers stay server-side.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicSettings {
    pub order_system: bool,
    pub dine_in: bool,
    pub takeaway: bool,
    pub feedback_enabled: bool,
    pub footer: FooterInfo,
}
