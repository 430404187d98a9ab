use std::sync::Arc;

use bytes::Bytes;

use super::{run_blocking, DishKey, ServiceError};
use crate::config::Config;
use crate::object_store::ObjectStore;
use crate::storage::models::PhotoRecord;
use crate::storage::Database;

/// Dish photos: metadata in redb, transcoded blobs in the object store.
///
/// A blob is always written before the row that references it and removed
/// before that row is deleted, so no row ever points at a missing blob. The
/// reverse (a blob with no row) can happen and is cleaned up by
/// [`super::reconcile::sweep_orphaned_blobs`].
#[derive(Clone)]
pub struct PhotoService {
    pub(super) db: Database,
    pub(super) blobs: Arc<dyn ObjectStore>,
    pub(super) config: Arc<Config>,
}

/// An inbound photo as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Uploader's filename, kept for display only.
    pub original_name: Option<String>,
    /// Declared content type of the upload.
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A catalogued photo and the URL it is served at.
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub record: PhotoRecord,
    pub url: String,
}

impl PhotoService {
    pub fn new(db: Database, blobs: Arc<dyn ObjectStore>, config: Arc<Config>) -> Self {
        Self { db, blobs, config }
    }

    /// Photos of one dish, newest first.
    pub async fn list(&self, dish: &DishKey) -> Result<Vec<StoredPhoto>, ServiceError> {
        let db = self.db.clone();
        let key = dish.clone();
        let records = run_blocking(move || db.list_photos(&key.subject, key.sub_index)).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let url = self.config.blob_url(&record.blob_name);
                StoredPhoto { record, url }
            })
            .collect())
    }

    pub async fn get(&self, id: u64) -> Result<Option<PhotoRecord>, ServiceError> {
        let db = self.db.clone();
        run_blocking(move || db.get_photo(id)).await
    }
}
