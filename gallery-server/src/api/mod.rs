//! API routes for gallery-server

pub mod auth;
pub mod download;
pub mod health;
pub mod images;
pub mod like;
pub mod seed;
pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Room for the non-file multipart fields and part headers
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let mut gallery = Router::new()
        .route(
            "/api/images",
            get(images::list_images).post(upload::upload_image),
        )
        .route("/api/images/download-all", get(download::download_all))
        .route("/api/images/{id}", get(images::get_image))
        .route("/api/images/{id}/like", post(like::like_image));

    if state.development {
        gallery = gallery.route("/api/images/seed", post(seed::seed_images));
    }

    let credentials = Router::new()
        .route("/api/auth", post(auth::login))
        .route("/api/test-auth", get(auth::test_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(gallery)
        .merge(credentials)
        .layer(DefaultBodyLimit::max(
            state.max_upload_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
