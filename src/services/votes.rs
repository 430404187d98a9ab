use std::collections::BTreeMap;

use super::{run_blocking, DishKey, ServiceError};
use crate::storage::models::VoteTally;
use crate::storage::Database;

/// Read and increment dish vote tallies.
#[derive(Clone)]
pub struct VoteService {
    db: Database,
}

/// Outcome of a successful vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVote {
    pub dish: DishKey,
    pub likes: u64,
}

impl VoteService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn likes(&self, dish: &DishKey) -> Result<u64, ServiceError> {
        let db = self.db.clone();
        let dish = dish.clone();
        run_blocking(move || db.get_likes(&dish.subject, dish.sub_index)).await
    }

    pub async fn all_likes(&self) -> Result<BTreeMap<String, u64>, ServiceError> {
        let db = self.db.clone();
        run_blocking(move || db.get_all_likes()).await
    }

    /// The only mutating entry point. There is no way to take a vote back.
    pub async fn record_vote(&self, dish: &DishKey) -> Result<RecordedVote, ServiceError> {
        let db = self.db.clone();
        let key = dish.clone();
        let likes = run_blocking(move || db.increment_likes(&key.subject, key.sub_index)).await?;

        tracing::debug!(
            subject = %dish.subject,
            sub_index = dish.sub_index,
            likes,
            "Recorded vote"
        );

        Ok(RecordedVote {
            dish: dish.clone(),
            likes,
        })
    }

    pub async fn top(&self, limit: usize) -> Result<Vec<VoteTally>, ServiceError> {
        let db = self.db.clone();
        run_blocking(move || db.top_likes(limit)).await
    }
}
