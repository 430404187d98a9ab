use chrono::Utc;
use tracing::{info, warn};

use super::photos::{PhotoService, PhotoUpload, StoredPhoto};
use super::transcode::{transcode, OUTPUT_EXTENSION};
use super::{run_blocking, DishKey, ServiceError};
use crate::storage::models::NewPhoto;

const MAX_ORIGINAL_NAME_LEN: usize = 255;

impl PhotoService {
    /// Reject uploads whose declared content type is not an image.
    /// Cheap enough to call before reading the body.
    pub fn check_media_type(content_type: Option<&str>) -> Result<(), ServiceError> {
        match content_type {
            Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
            _ => Err(ServiceError::UnsupportedMediaType),
        }
    }

    /// Reject payloads above the configured upload cap.
    pub fn check_size(&self, len: u64) -> Result<(), ServiceError> {
        let limit = self.config.max_upload_size;
        if len > limit {
            return Err(ServiceError::PayloadTooLarge { limit });
        }
        Ok(())
    }

    /// Validate, transcode, store the blob, then catalogue it.
    pub async fn ingest(
        &self,
        dish: &DishKey,
        upload: PhotoUpload,
    ) -> Result<StoredPhoto, ServiceError> {
        Self::check_media_type(upload.content_type.as_deref())?;
        if upload.data.is_empty() {
            return Err(ServiceError::NoPhoto);
        }
        self.check_size(upload.data.len() as u64)?;

        let original_len = upload.data.len();
        let settings = self.config.images.clone();
        let data = upload.data;
        let transcoded = tokio::task::spawn_blocking(move || transcode(&data, &settings)).await??;

        let blob_name = format!("{}.{}", uuid::Uuid::new_v4(), OUTPUT_EXTENSION);
        let byte_size = transcoded.data.len() as u64;

        // Blob first: a row must never reference a file that is not there yet.
        self.blobs.put(&blob_name, transcoded.data).await?;

        let new_photo = NewPhoto {
            subject: dish.subject.clone(),
            sub_index: dish.sub_index,
            blob_name: blob_name.clone(),
            original_name: display_name(upload.original_name),
            byte_size,
            width: transcoded.width,
            height: transcoded.height,
            created_at: Utc::now(),
        };

        let db = self.db.clone();
        let record = match run_blocking(move || db.insert_photo(new_photo)).await {
            Ok(record) => record,
            Err(e) => {
                // Best-effort cleanup; a leftover blob is harmless and swept later.
                if let Err(cleanup) = self.blobs.delete(&blob_name).await {
                    warn!(
                        blob_name = %blob_name,
                        error = %cleanup,
                        "Failed to remove blob of uncatalogued photo"
                    );
                }
                return Err(e);
            }
        };

        info!(
            photo_id = record.id,
            blob_name = %record.blob_name,
            subject = %record.subject,
            sub_index = record.sub_index,
            original_bytes = original_len,
            stored_bytes = record.byte_size,
            "Stored photo"
        );

        let url = self.config.blob_url(&record.blob_name);
        Ok(StoredPhoto { record, url })
    }
}

fn display_name(name: Option<String>) -> String {
    let name = name.unwrap_or_default();
    match name.char_indices().nth(MAX_ORIGINAL_NAME_LEN) {
        Some((cut, _)) => name[..cut].to_string(),
        None => name,
    }
}
