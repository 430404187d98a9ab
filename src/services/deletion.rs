use tracing::{info, warn};

use super::photos::PhotoService;
use super::{run_blocking, ServiceError};

impl PhotoService {
    /// Remove a photo: blob first (best effort), then the row.
    ///
    /// The row goes even when the blob could not be removed, so a photo whose
    /// file vanished by other means can still be deleted. A concurrent delete
    /// of the same id makes the loser report [`ServiceError::PhotoNotFound`].
    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let photo = self.get(id).await?.ok_or(ServiceError::PhotoNotFound)?;

        if let Err(e) = self.blobs.delete(&photo.blob_name).await {
            warn!(
                photo_id = id,
                blob_name = %photo.blob_name,
                error = %e,
                "Failed to delete photo blob"
            );
        }

        let db = self.db.clone();
        if !run_blocking(move || db.delete_photo(id)).await? {
            return Err(ServiceError::PhotoNotFound);
        }

        info!(photo_id = id, blob_name = %photo.blob_name, "Deleted photo");
        Ok(())
    }
}
