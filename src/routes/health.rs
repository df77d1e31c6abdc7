use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: String,
    /// False until the first snapshot has been read from the store.
    catalog_live: bool,
    catalog_revision: Option<u64>,
    open_carts: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let revision = state.catalog.current().map(|s| s.revision);
    let data = HealthData {
        status: "ok".to_string(),
        catalog_live: state.catalog.is_online(),
        catalog_revision: revision,
        open_carts: state.carts.len().await,
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
