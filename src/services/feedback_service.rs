use serde_json::json;

use crate::{
    audit,
    composer::{FeedbackForm, compose_feedback, whatsapp_link},
    dto::feedback::FeedbackLink,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn send_feedback(
    state: &AppState,
    form: FeedbackForm,
) -> AppResult<ApiResponse<FeedbackLink>> {
    let message = compose_feedback(&form)?;

    let snapshot = state.catalog.live().ok_or_else(|| {
        AppError::Offline("no connection to the menu store, feedback was not sent".into())
    })?;
    let phone = &snapshot.settings.complaints_whatsapp;
    if phone.is_empty() {
        return Err(AppError::BadRequest(
            "no WhatsApp number configured for feedback".into(),
        ));
    }

    tracing::info!(rating = form.rating, "feedback handed to whatsapp");
    audit::record(
        &state.pool,
        None,
        "feedback_sent",
        "feedback",
        json!({ "rating": form.rating }),
    )
    .await;
    let whatsapp_url = whatsapp_link(phone, &message);
    Ok(ApiResponse::success(
        "Feedback ready",
        FeedbackLink {
            message,
            whatsapp_url,
        },
        Some(Meta::empty()),
    ))
}
