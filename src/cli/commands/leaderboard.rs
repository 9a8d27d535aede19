//! `upliftxp leaderboard`

use anyhow::Result;
use clap::Args;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{AccountId, Config};
use crate::services::LeaderboardEntry;

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    /// Number of entries to show (defaults to progression.leaderboard_limit)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
pub struct LeaderboardOutput {
    pub entries: Vec<LeaderboardEntry>,
    pub you: Option<AccountId>,
}

impl CommandOutput for LeaderboardOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No players yet.".to_string();
        }
        TableFormatter::new().format_leaderboard(&self.entries, self.you.as_ref())
    }
}

pub async fn execute(args: LeaderboardArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let limit = args
        .limit
        .unwrap_or(config.progression.leaderboard_limit)
        .max(1);
    let entries = ctx.leaderboard().top(limit).await?;
    // Anonymous viewing is allowed; the highlight needs a session.
    let you = ctx.accounts().require_account().await.ok();

    output(&LeaderboardOutput { entries, you }, json_mode);
    Ok(())
}
