//! Shared test helpers for in-crate tests.

use std::sync::Arc;

use crate::config::{Config, StorageConfig};
use crate::object_store::LocalStore;
use crate::storage::Database;
use crate::AppState;

/// Create a test AppState with an in-memory database and a temporary blob directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let uploads_dir = temp_dir.path().join("uploads");

    let config = Config {
        storage: StorageConfig {
            data_dir: temp_dir.path().join("data"),
            uploads_dir: uploads_dir.clone(),
            ..StorageConfig::default()
        },
        ..Config::default()
    };

    let db = Database::in_memory().expect("Failed to open test database");
    let object_store = LocalStore::new(&uploads_dir).expect("Failed to create test object store");

    Arc::new(AppState::new(config, db, Arc::new(object_store)))
}
