use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{NewPhoto, PhotoRecord};
use super::tables::*;

impl Database {
    // ========================================================================
    // Photo metadata
    // ========================================================================

    /// Assign the next photo id, store the record and index it under its dish.
    pub fn insert_photo(&self, photo: NewPhoto) -> Result<PhotoRecord, DatabaseError> {
        debug_assert!(!photo.blob_name.is_empty(), "blob name must not be empty");

        let write_txn = self.begin_write()?;
        let record = {
            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let last = sequences
                .get(PHOTO_ID_SEQUENCE)?
                .map(|v| v.value())
                .unwrap_or(0);
            let id = last + 1;
            sequences.insert(PHOTO_ID_SEQUENCE, id)?;

            let record = photo.with_id(id);
            let data = rmp_serde::to_vec_named(&record)?;
            let mut table = write_txn.open_table(PHOTOS)?;
            table.insert(id, data.as_slice())?;

            let key = (record.subject.as_str(), record.sub_index);
            let mut subject_table = write_txn.open_table(SUBJECT_PHOTOS)?;
            let mut photo_ids: Vec<u64> = match subject_table.get(key)? {
                Some(v) => rmp_serde::from_slice(v.value())?,
                None => Vec::new(),
            };
            photo_ids.push(id);
            let index_data = rmp_serde::to_vec_named(&photo_ids)?;
            subject_table.insert(key, index_data.as_slice())?;

            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// Get a photo by id
    pub fn get_photo(&self, id: u64) -> Result<Option<PhotoRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PHOTOS)?;
        match table.get(id)? {
            Some(data) => {
                let photo: PhotoRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(photo))
            }
            None => Ok(None),
        }
    }

    /// Photos of one dish, newest first.
    pub fn list_photos(
        &self,
        subject: &str,
        sub_index: u32,
    ) -> Result<Vec<PhotoRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let subject_table = read_txn.open_table(SUBJECT_PHOTOS)?;
        let photos_table = read_txn.open_table(PHOTOS)?;

        let photo_ids: Vec<u64> = match subject_table.get((subject, sub_index))? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut photos = Vec::with_capacity(photo_ids.len());
        for photo_id in photo_ids {
            if let Some(data) = photos_table.get(photo_id)? {
                let photo: PhotoRecord = rmp_serde::from_slice(data.value())?;
                photos.push(photo);
            }
        }

        // Ids grow with insertion time, so they break timestamp ties.
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(photos)
    }

    /// Blob names of every stored photo.
    pub fn all_blob_names(&self) -> Result<Vec<String>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PHOTOS)?;

        let mut names = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let photo: PhotoRecord = rmp_serde::from_slice(value.value())?;
            names.push(photo.blob_name);
        }
        Ok(names)
    }

    /// Remove a photo row and its dish index entry. Leaves the blob alone.
    /// Returns false if the id was not present.
    pub fn delete_photo(&self, id: u64) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<PhotoRecord> = {
            let table = write_txn.open_table(PHOTOS)?;
            let result = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            result
        };

        let deleted = match existing {
            Some(photo) => {
                {
                    let mut table = write_txn.open_table(PHOTOS)?;
                    table.remove(id)?;
                }

                let key = (photo.subject.as_str(), photo.sub_index);
                let photo_ids: Option<Vec<u64>> = {
                    let subject_table = write_txn.open_table(SUBJECT_PHOTOS)?;
                    let result = match subject_table.get(key)? {
                        Some(data) => Some(rmp_serde::from_slice(data.value())?),
                        None => None,
                    };
                    result
                };

                if let Some(mut ids) = photo_ids {
                    ids.retain(|pid| *pid != id);
                    let mut subject_table = write_txn.open_table(SUBJECT_PHOTOS)?;
                    if ids.is_empty() {
                        subject_table.remove(key)?;
                    } else {
                        let data = rmp_serde::to_vec_named(&ids)?;
                        subject_table.insert(key, data.as_slice())?;
                    }
                }
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }
}
