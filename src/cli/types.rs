//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::{
    account::AccountArgs, advice::AdviceArgs, init::InitArgs, leaderboard::LeaderboardArgs,
    progress::ProgressArgs, screening::ScreeningArgs, steps::StepsArgs, tasks::TasksArgs,
};

#[derive(Parser, Debug)]
#[command(name = "upliftxp")]
#[command(about = "UpliftXP - daily wellness tasks, XP levels and streaks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration and database
    Init(InitArgs),
    /// Sign up, sign in and out
    Account(AccountArgs),
    /// Today's tasks and completions
    Tasks(TasksArgs),
    /// Level, XP and streak
    Progress(ProgressArgs),
    /// Top players by XP
    Leaderboard(LeaderboardArgs),
    /// Mental-health self-assessments
    Screening(ScreeningArgs),
    /// Wellness tips and dietary advice
    Advice(AdviceArgs),
    /// Step and distance tracking
    Steps(StepsArgs),
}
