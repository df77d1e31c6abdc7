use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod carts;
pub mod doc;
pub mod feedback;
pub mod health;
pub mod menu;
pub mod settings;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/settings", settings::router())
        .nest("/carts", carts::router())
        .nest("/feedback", feedback::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
