use axum::{Json, Router, extract::State, routing::post};

use crate::{
    composer::FeedbackForm,
    dto::feedback::FeedbackLink,
    error::AppResult,
    response::ApiResponse,
    services::feedback_service::send_feedback,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(feedback))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackForm,
    responses(
        (status = 200, description = "Feedback message and WhatsApp link", body = ApiResponse<FeedbackLink>),
        (status = 400, description = "No feedback number configured"),
        (status = 422, description = "Missing message or rating above 5"),
        (status = 503, description = "Menu store unreachable")
    ),
    tag = "Feedback"
)]
pub async fn feedback(
    State(state): State<AppState>,
    Json(form): Json<FeedbackForm>,
) -> AppResult<Json<ApiResponse<FeedbackLink>>> {
    let resp = send_feedback(&state, form).await?;
    Ok(Json(resp))
}
