use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use super::handlers::{analyze_token, download_report, ping};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/analyze", post(analyze_token))
        .route("/download/:filename", get(download_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
