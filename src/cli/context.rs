//! Wiring shared by the commands: open the database and build services.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteIdentityProvider, SqliteProgressStore,
};
use crate::domain::models::{AccountId, Config};
use crate::services::{AccountService, LeaderboardService, ProgressionService, ScreeningService};

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteProgressStore>,
    pub identity: Arc<SqliteIdentityProvider>,
}

impl AppContext {
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = initialize_database(
            &config.database.url(),
            Some(PoolConfig::from(&config.database)),
        )
        .await
        .context("Failed to open database. Run 'upliftxp init' first.")?;

        let store = SqliteProgressStore::new(pool.clone())
            .with_max_attempts(config.progression.max_write_attempts);
        Ok(Self {
            config: config.clone(),
            store: Arc::new(store),
            identity: Arc::new(SqliteIdentityProvider::new(pool)),
        })
    }

    pub fn accounts(&self) -> AccountService<SqliteIdentityProvider, SqliteProgressStore> {
        AccountService::new(self.identity.clone(), self.store.clone())
    }

    pub fn progression(&self) -> ProgressionService<SqliteProgressStore> {
        ProgressionService::new(self.store.clone(), self.config.progression.clone())
    }

    pub fn leaderboard(&self) -> LeaderboardService<SqliteProgressStore> {
        LeaderboardService::new(self.store.clone())
    }

    pub fn screening(&self) -> ScreeningService<SqliteProgressStore> {
        ScreeningService::new(self.store.clone(), self.config.progression.max_write_attempts)
    }

    /// The signed-in account, or `AuthRequired`.
    pub async fn require_account(&self) -> Result<AccountId> {
        Ok(self.accounts().require_account().await?)
    }
}
