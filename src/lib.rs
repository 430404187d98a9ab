//! festival-likes - Likes and dish photos for the festival restaurant guide
//!
//! This crate provides the backend consumed by the festival catalog frontend:
//! - Per-dish vote tallies with atomic increments
//! - Photo uploads transcoded to bounded JPEGs and catalogued per dish
//! - redb embedded database for tallies and photo metadata (ACID, crash-safe)
//! - REST API with multipart upload support and blob serving

pub mod api;
pub mod config;
pub mod object_store;
pub mod services;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use object_store::ObjectStore;
use services::{PhotoService, VoteService};
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Arc<Config>,
    pub object_store: Arc<dyn ObjectStore>,
    pub votes: VoteService,
    pub photos: PhotoService,
}

impl AppState {
    pub fn new(config: Config, db: Database, object_store: Arc<dyn ObjectStore>) -> Self {
        let config = Arc::new(config);
        Self {
            votes: VoteService::new(db.clone()),
            photos: PhotoService::new(db, Arc::clone(&object_store), Arc::clone(&config)),
            config,
            object_store,
        }
    }
}
