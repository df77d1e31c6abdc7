use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackLink {
    pub message: String,
    pub whatsapp_url: String,
}
