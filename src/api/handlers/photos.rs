use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::BytesMut;
use serde::Serialize;

use crate::api::response::{ApiError, MessageResponse};
use crate::services::{parse_photo_id, DishKey, PhotoService, PhotoUpload, StoredPhoto};
use crate::AppState;

const UPLOAD_FAILED: &str = "Failed to upload photo";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoResponse {
    pub id: u64,
    pub blob_name: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: u64,
    pub subject: String,
    pub sub_index: u32,
    pub blob_name: String,
    pub original_name: String,
    pub byte_size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: String,
    pub url: String,
    #[serde(rename = "thumbnail_url")]
    pub thumbnail_url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Route: POST /api/photos/:subject/:sub_index (multipart, field `photo`)
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Path((subject, sub_index)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Json<UploadPhotoResponse>, ApiError> {
    let dish = DishKey::parse(&subject, &sub_index)
        .map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;

    let mut upload: Option<PhotoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        if field.name() != Some("photo") {
            // Ignore unknown fields
            continue;
        }

        let content_type = field.content_type().map(|s| s.to_string());
        PhotoService::check_media_type(content_type.as_deref())
            .map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;

        let original_name = field.file_name().map(|s| s.to_string());
        let data = read_limited(&state.photos, field).await?;

        upload = Some(PhotoUpload {
            original_name,
            content_type,
            data: data.freeze(),
        });
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No photo provided"))?;

    let stored = state
        .photos
        .ingest(&dish, upload)
        .await
        .map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;

    Ok(Json(UploadPhotoResponse {
        id: stored.record.id,
        blob_name: stored.record.blob_name,
        url: stored.url,
        width: stored.record.width,
        height: stored.record.height,
        message: "Photo uploaded successfully".to_string(),
    }))
}

/// Route: GET /api/photos/:subject/:sub_index
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    Path((subject, sub_index)): Path<(String, String)>,
) -> Result<Json<Vec<PhotoResponse>>, ApiError> {
    let dish = DishKey::parse(&subject, &sub_index)
        .map_err(|e| ApiError::from_service(e, "Failed to get photos"))?;

    let photos = state
        .photos
        .list(&dish)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to get photos"))?;

    Ok(Json(photos.into_iter().map(photo_to_response).collect()))
}

/// Route: DELETE /api/photos/:id
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id =
        parse_photo_id(&id).map_err(|e| ApiError::from_service(e, "Failed to delete photo"))?;

    state
        .photos
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete photo"))?;

    Ok(MessageResponse::new("Photo deleted successfully"))
}

// ============================================================================
// Helpers
// ============================================================================

/// Read a multipart field, bailing out as soon as it grows past the upload cap.
async fn read_limited(photos: &PhotoService, mut field: Field<'_>) -> Result<BytesMut, ApiError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read photo: {e}")))?
    {
        photos
            .check_size((buf.len() + chunk.len()) as u64)
            .map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

fn photo_to_response(photo: StoredPhoto) -> PhotoResponse {
    let record = photo.record;
    PhotoResponse {
        id: record.id,
        subject: record.subject,
        sub_index: record.sub_index,
        blob_name: record.blob_name,
        original_name: record.original_name,
        byte_size: record.byte_size,
        width: record.width,
        height: record.height,
        created_at: record.created_at.to_rfc3339(),
        thumbnail_url: photo.url.clone(),
        url: photo.url,
    }
}
