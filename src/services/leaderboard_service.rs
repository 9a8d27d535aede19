//! XP leaderboard.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{level_for_xp, AccountId};
use crate::domain::ports::ProgressStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub account_id: AccountId,
    pub name: String,
    pub xp: u64,
    pub level: u64,
    pub streak: u32,
}

pub struct LeaderboardService<S: ProgressStore> {
    store: Arc<S>,
}

impl<S: ProgressStore> LeaderboardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Top `limit` accounts by XP.
    pub async fn top(&self, limit: u32) -> DomainResult<Vec<LeaderboardEntry>> {
        let rows = self.store.query_top_by_xp(limit).await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, stored)| LeaderboardEntry {
                rank: index + 1,
                name: stored.progress.display_name(&stored.account_id),
                xp: stored.progress.xp,
                // Stored levels may predate the current calculator.
                level: level_for_xp(stored.progress.xp),
                streak: stored.progress.streak,
                account_id: stored.account_id,
            })
            .collect())
    }
}
