use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

pub fn create_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::page::index_page))
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/sessions", post(handlers::sessions::create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route(
            "/api/v1/sessions/:id/dataset",
            post(handlers::sessions::replace_dataset),
        )
        .route(
            "/api/v1/sessions/:id/horizon",
            put(handlers::sessions::update_horizon),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
