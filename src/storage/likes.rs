use std::collections::BTreeMap;

use chrono::Utc;
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::VoteTally;
use super::tables::*;

impl Database {
    // ========================================================================
    // Vote tallies
    // ========================================================================

    /// Current vote count for a dish; 0 when nobody has voted yet.
    pub fn get_likes(&self, subject: &str, sub_index: u32) -> Result<u64, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(VOTE_TALLIES)?;
        match table.get((subject, sub_index))? {
            Some(data) => {
                let tally: VoteTally = rmp_serde::from_slice(data.value())?;
                Ok(tally.count)
            }
            None => Ok(0),
        }
    }

    /// Every tally keyed `"subject-subIndex"`, for priming the client cache.
    pub fn get_all_likes(&self) -> Result<BTreeMap<String, u64>, DatabaseError> {
        Ok(self
            .get_all_tallies()?
            .into_iter()
            .map(|tally| (tally.cache_key(), tally.count))
            .collect())
    }

    /// All tally rows in key order.
    pub fn get_all_tallies(&self) -> Result<Vec<VoteTally>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(VOTE_TALLIES)?;

        let mut tallies = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let tally: VoteTally = rmp_serde::from_slice(value.value())?;
            tallies.push(tally);
        }
        Ok(tallies)
    }

    /// Create the tally at 1 or bump it by one, returning the new count.
    ///
    /// The read and the write happen inside one write transaction. redb runs
    /// write transactions one at a time, so concurrent callers on the same key
    /// each observe the previous caller's committed value.
    pub fn increment_likes(&self, subject: &str, sub_index: u32) -> Result<u64, DatabaseError> {
        let write_txn = self.begin_write()?;
        let count = {
            let mut table = write_txn.open_table(VOTE_TALLIES)?;
            let existing: Option<VoteTally> = match table.get((subject, sub_index))? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };

            let now = Utc::now();
            let tally = match existing {
                Some(mut tally) => {
                    tally.count += 1;
                    tally.updated_at = now;
                    tally
                }
                None => VoteTally {
                    subject: subject.to_string(),
                    sub_index,
                    count: 1,
                    created_at: now,
                    updated_at: now,
                },
            };

            let data = rmp_serde::to_vec_named(&tally)?;
            table.insert((subject, sub_index), data.as_slice())?;
            tally.count
        };
        write_txn.commit()?;
        Ok(count)
    }

    /// The `limit` most liked dishes, highest count first. Ties keep key order.
    pub fn top_likes(&self, limit: usize) -> Result<Vec<VoteTally>, DatabaseError> {
        let mut tallies = self.get_all_tallies()?;
        tallies.sort_by(|a, b| b.count.cmp(&a.count));
        tallies.truncate(limit);
        Ok(tallies)
    }
}
