//! Image listing and lookup
//!
//! - GET /api/images?limit&offset&sortBy&sortOrder → { rows, total }
//! - GET /api/images/{id} → Image

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::AppError;
use shared::models::Image;
use shared::{ImageListResponse, ListParams, ListQuery};

use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn list_images(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServiceResult<Json<ImageListResponse>> {
    let query = ListQuery::try_from(params)?;

    let (rows, total) = tokio::try_join!(state.images.list(&query), state.images.count())?;

    tracing::debug!(
        limit = ?query.limit,
        offset = query.offset,
        sort_by = ?query.sort_by,
        sort_order = ?query.sort_order,
        returned = rows.len(),
        total,
        "Listed images"
    );

    Ok(Json(ImageListResponse { rows, total }))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Image>> {
    let image = state
        .images
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::image_not_found(id))?;
    Ok(Json(image))
}
