use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vote count for one dish. Absence of a row means zero votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub subject: String,
    pub sub_index: u32,
    pub count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoteTally {
    /// Key used by the bulk listing consumed by the frontend cache.
    pub fn cache_key(&self) -> String {
        tally_key(&self.subject, self.sub_index)
    }
}

/// `"subject-subIndex"` as primed into the client-side likes cache.
pub fn tally_key(subject: &str, sub_index: u32) -> String {
    format!("{subject}-{sub_index}")
}

/// A photo record stored in redb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: u64,
    pub subject: String,
    pub sub_index: u32,
    /// Generated name of the stored blob. Never derived from user input.
    pub blob_name: String,
    /// Name supplied by the uploader, display only.
    pub original_name: String,
    /// Size of the transcoded blob, not the upload.
    pub byte_size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Everything a [`PhotoRecord`] carries except the store-assigned id.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub subject: String,
    pub sub_index: u32,
    pub blob_name: String,
    pub original_name: String,
    pub byte_size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl NewPhoto {
    pub(crate) fn with_id(self, id: u64) -> PhotoRecord {
        PhotoRecord {
            id,
            subject: self.subject,
            sub_index: self.sub_index,
            blob_name: self.blob_name,
            original_name: self.original_name,
            byte_size: self.byte_size,
            width: self.width,
            height: self.height,
            created_at: self.created_at,
        }
    }
}
