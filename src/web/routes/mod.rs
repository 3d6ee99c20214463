//! Contains all the routes that this application can handle.

mod api;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::AppState;

#[tracing::instrument(name = "health_check", level = "trace")]
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new().nest("/api", api_routes(app_state))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/subscription",
            post(api::create_subscriber).put(api::update_subscriber),
        )
        .route(
            "/subscription/{email}",
            get(api::get_subscriber).delete(api::delete_subscriber),
        )
        .with_state(app_state)
}
