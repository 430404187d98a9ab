//! Removal of blobs that no photo row references.
//!
//! Uploads write the blob before the row, so a failed row insert can leave a
//! blob behind, and a crash mid-write can leave a partial blob file. This
//! sweep deletes both kinds of leftovers. It must not run while uploads are
//! in flight: a blob whose row is about to be inserted would look orphaned. The server
//! only runs it at startup, before accepting requests.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use super::{run_blocking, ServiceError};
use crate::object_store::ObjectStore;
use crate::storage::Database;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    pub scanned: u64,
    pub removed: u64,
    pub partials_removed: u64,
}

pub async fn sweep_orphaned_blobs(
    db: &Database,
    blobs: &dyn ObjectStore,
) -> Result<SweepStats, ServiceError> {
    let db = db.clone();
    let referenced: HashSet<String> = run_blocking(move || db.all_blob_names())
        .await?
        .into_iter()
        .collect();

    let mut stats = SweepStats::default();

    for partial in blobs.remove_partials().await? {
        stats.partials_removed += 1;
        info!(file = %partial, "Removed partial blob");
    }

    for blob_name in blobs.list().await? {
        stats.scanned += 1;
        if referenced.contains(&blob_name) {
            continue;
        }
        match blobs.delete(&blob_name).await {
            Ok(()) => {
                stats.removed += 1;
                info!(blob_name = %blob_name, "Removed orphaned blob");
            }
            Err(e) => warn!(blob_name = %blob_name, error = %e, "Failed to remove orphaned blob"),
        }
    }

    Ok(stats)
}
