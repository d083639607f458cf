//! Image upload API
//!
//! POST /api/images — multipart form → verify credentials → object storage → metadata record
//!
//! Form fields: `file` (required), `title`, `tags`, `aiModel`, `prompt` / `prompts`,
//! `description`, `username`, `password`.
//! Objects are stored at `images/{uuid}.{ext}`; the record keeps the public URL.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Image, ImageCreate, file_extension};

use crate::error::ServiceResult;
use crate::state::AppState;
use crate::storage::image_key;

/// Name recorded when the file part carries no filename
const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub image: Image,
}

/// Everything read from the multipart body, before validation
#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    file: Option<Vec<u8>>,
    title: Option<String>,
    tags: Vec<String>,
    ai_model: Option<String>,
    prompts: Option<String>,
    description: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl UploadForm {
    /// Drain the whole body; credentials may arrive after the file part.
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
                }
                "tags" => form.tags.extend(parse_tags(&text(field).await?)),
                "title" => form.title = non_blank(text(field).await?),
                "aiModel" => form.ai_model = non_blank(text(field).await?),
                "prompt" | "prompts" => form.prompts = non_blank(text(field).await?),
                "description" => form.description = non_blank(text(field).await?),
                "username" => form.username = Some(text(field).await?),
                "password" => form.password = Some(text(field).await?),
                other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
            }
        }

        Ok(form)
    }
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::FileTooLarge)
    } else {
        AppError::with_message(ErrorCode::MalformedUpload, format!("Multipart error: {e}"))
    }
}

/// Accepts a JSON array (`["a","b"]`) or a comma-separated list (`a, b`).
/// Entries are trimmed and blanks dropped; order and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list.iter().filter_map(|t| non_blank(t.clone())).collect();
        }
    }
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// POST /api/images — upload an image with its metadata
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServiceResult<Json<UploadResponse>> {
    let form = UploadForm::read(multipart).await?;

    state
        .credentials
        .verify(form.username.as_deref(), form.password.as_deref())?;

    let data = form
        .file
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile).into());
    }

    if data.len() > state.max_upload_bytes {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large: {} bytes (max {})",
                data.len(),
                state.max_upload_bytes
            ),
        )
        .into());
    }

    let file_name = form
        .file_name
        .and_then(non_blank)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    let key = image_key(&file_extension(&file_name));
    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();
    let size = data.len();

    let uri = state.storage.put(&key, data, &content_type).await?;

    let image = state
        .images
        .create(ImageCreate {
            file_name,
            uri,
            title: form.title,
            prompts: form.prompts,
            description: form.description,
            ai_model: form.ai_model,
            tags: form.tags,
        })
        .await
        .inspect_err(|e| {
            tracing::error!(key = %key, error = %e, "Metadata insert failed, object left orphaned");
        })?;

    tracing::info!(
        image_id = %image.id,
        key = %key,
        size,
        content_type = %content_type,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        success: true,
        image,
    }))
}
