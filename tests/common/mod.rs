//! Common test utilities for integration tests
//!
//! Provides shared fixtures used across multiple integration test files.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;

use upliftxp::adapters::sqlite::{
    create_migrated_test_pool, SqliteIdentityProvider, SqliteProgressStore,
};
use upliftxp::domain::models::{ProgressionConfig, Task};
use upliftxp::services::ProgressionService;
use upliftxp::{AccountId, ProgressStore, UserProgress};

/// In-memory store with migrations applied.
pub async fn setup_store() -> Arc<SqliteProgressStore> {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    Arc::new(SqliteProgressStore::new(pool))
}

/// Store and identity provider sharing one in-memory database.
pub async fn setup_store_and_identity() -> (Arc<SqliteProgressStore>, Arc<SqliteIdentityProvider>) {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    (
        Arc::new(SqliteProgressStore::new(pool.clone())),
        Arc::new(SqliteIdentityProvider::new(pool)),
    )
}

/// Create an empty progress document for `id`.
pub async fn new_account<S: ProgressStore>(store: &S, id: &str) -> AccountId {
    let id = AccountId::new(id);
    store
        .compare_and_swap(&id, None, &UserProgress::default())
        .await
        .expect("Failed to create progress document");
    id
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Three-task catalog so every rotation assigns the same tasks.
pub fn scenario_catalog() -> Vec<Task> {
    vec![
        Task::new("exercise", "🏃‍♂️ Exercise for 30 minutes", 30),
        Task::new("marathon", "Run a marathon", 1000),
        Task::new("water", "💧 Drink 8 glasses of water", 20),
    ]
}

pub fn engine<S: ProgressStore>(store: Arc<S>) -> ProgressionService<S> {
    ProgressionService::new(store, ProgressionConfig::default()).with_catalog(scenario_catalog())
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
