//! POST /api/images/{id}/like
//!
//! No per-caller deduplication: every call adds one like. Browsers remember
//! what they liked on their side.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::error::AppError;

use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub likes: i64,
}

pub async fn like_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<LikeResponse>> {
    let likes = state
        .images
        .increment_likes(&id)
        .await?
        .ok_or_else(|| AppError::image_not_found(id.clone()))?;

    tracing::info!(image_id = %id, likes, "Image liked");

    Ok(Json(LikeResponse {
        success: true,
        likes,
    }))
}
