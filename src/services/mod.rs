//! Request-level operations over the stores: voting, photo ingestion and
//! deletion, and the orphaned blob sweep.

mod deletion;
mod ingest;
mod input;
mod photos;
pub mod reconcile;
pub mod transcode;
mod votes;

pub use input::{parse_photo_id, parse_top_limit, DishKey, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT};
pub use photos::{PhotoService, PhotoUpload, StoredPhoto};
pub use votes::{RecordedVote, VoteService};

use thiserror::Error;

use crate::object_store::ObjectStoreError;
use crate::storage::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("No photo provided")]
    NoPhoto,
    #[error("Unsupported media type: only image uploads are accepted")]
    UnsupportedMediaType,
    #[error("Photo exceeds maximum upload size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },
    #[error("Photo not found")]
    PhotoNotFound,
    #[error("Transcoding failed: {0}")]
    Transcode(#[from] image::ImageError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Blob storage error: {0}")]
    Blob(#[from] ObjectStoreError),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run a redb call on the blocking pool. Write transactions queue behind one
/// another, which must not stall the async workers.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, DatabaseError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
