use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::object_store::ObjectStoreError;
use crate::AppState;

/// Serve a stored photo blob.
/// Route: GET /uploads/:blob_name
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(blob_name): axum::extract::Path<String>,
) -> Result<Response, ApiError> {
    let data = state
        .object_store
        .get(&blob_name)
        .await
        .map_err(|e| match e {
            ObjectStoreError::NotFound(_) | ObjectStoreError::InvalidKey(_) => {
                ApiError::not_found("File not found")
            }
            _ => {
                tracing::error!(blob_name = %blob_name, error = %e, "Failed to read blob");
                ApiError::internal("Failed to retrieve file")
            }
        })?;

    let byte_size = data.len() as u64;
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    let mime_type = mime_guess::from_path(&blob_name).first_or_octet_stream();
    headers.insert(
        header::CONTENT_TYPE,
        mime_type
            .as_ref()
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));

    // Blob names are never reused, so the content can be cached forever.
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    Ok(response)
}
