use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::menu::{ChangesQuery, FeaturedList, MenuResponse},
    error::AppResult,
    menu::MenuQuery,
    response::ApiResponse,
    services::menu_service::{self, CHANGES_POLL},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_menu))
        .route("/featured", get(featured))
        .route("/changes", get(changes))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("q" = Option<String>, Query, description = "Search item name, category name or price"),
        ("category_id" = Option<String>, Query, description = "Restrict to one category")
    ),
    responses(
        (status = 200, description = "Customer menu grouped by category", body = ApiResponse<MenuResponse>)
    ),
    tag = "Menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuResponse>>> {
    let resp = menu_service::get_menu(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/featured",
    responses(
        (status = 200, description = "Starred items", body = ApiResponse<FeaturedList>)
    ),
    tag = "Menu"
)]
pub async fn featured(State(state): State<AppState>) -> AppResult<Json<ApiResponse<FeaturedList>>> {
    let resp = menu_service::featured(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/changes",
    params(
        ("since" = Option<u64>, Query, description = "Last revision the client has seen"),
        ("q" = Option<String>, Query, description = "Search applied to the returned menu"),
        ("category_id" = Option<String>, Query, description = "Restrict to one category")
    ),
    responses(
        (status = 200, description = "A newer menu was published", body = ApiResponse<MenuResponse>),
        (status = 204, description = "Nothing changed before the poll timed out")
    ),
    tag = "Menu"
)]
pub async fn changes(
    State(state): State<AppState>,
    Query(since): Query<ChangesQuery>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Response> {
    let since = since.since.unwrap_or(0);
    match menu_service::changes(&state, since, query, CHANGES_POLL).await? {
        Some(resp) => Ok(Json(resp).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
