//! POST /api/images/seed (development only)
//!
//! Stamps every non-deleted image with placeholder tags and model so the
//! gallery filters have something to show.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    pub modified_count: u64,
}

pub async fn seed_images(State(state): State<AppState>) -> ServiceResult<Json<SeedResponse>> {
    let modified = state.images.seed_test_metadata().await?;
    tracing::info!(modified, "Seeded test metadata");

    Ok(Json(SeedResponse {
        success: true,
        message: format!("Updated {modified} images with test data"),
        modified_count: modified,
    }))
}
