//! Progress CLI commands: overview, debug reset and the date override.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, LevelInfo, UserProgress, STREAK_NOT_STARTED};
use crate::services::{today_utc, DaySnapshot, DayTransition, StreakUpdate};

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    /// Show level, XP and streak
    Show,
    /// Reset XP and streak to zero (penalty tasks are kept)
    Reset,
    /// Treat the given date as today and run the day transition
    SetDate {
        /// Date in YYYY-MM-DD format
        date: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ProgressOutput {
    pub level: LevelInfo,
    pub streak: u32,
    pub last_streak_date: Option<String>,
    pub last_task_date: Option<String>,
    pub tasks_completed_today: usize,
    pub tasks_today: usize,
    pub penalty_tasks: usize,
    pub total_tasks_completed: u64,
    pub transition: DayTransition,
    pub message: Option<String>,
}

impl ProgressOutput {
    fn new(progress: &UserProgress, transition: DayTransition) -> Self {
        Self {
            level: progress.level_info(),
            streak: progress.streak,
            last_streak_date: (progress.last_streak_date != STREAK_NOT_STARTED)
                .then(|| progress.last_streak_date.to_string()),
            last_task_date: progress.last_task_date.map(|date| date.to_string()),
            tasks_completed_today: progress.completed_daily_count(),
            tasks_today: progress.daily_tasks.len(),
            penalty_tasks: progress.penalty_tasks.len(),
            total_tasks_completed: progress.total_tasks_completed,
            transition,
            message: None,
        }
    }

    fn from_snapshot(snapshot: &DaySnapshot) -> Self {
        Self::new(&snapshot.progress, snapshot.transition)
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

impl CommandOutput for ProgressOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(message) = &self.message {
            lines.push(message.clone());
        }
        lines.push(format!(
            "{} {}",
            style(format!("Level {}", self.level.level)).bold(),
            progress_bar(self.level.progress, 20)
        ));
        lines.push(format!(
            "XP: {} / {} ({} to go)",
            self.level.xp,
            self.level.next_level_xp,
            self.level.xp_remaining()
        ));
        lines.push(format!("Streak: {} day(s)", self.streak));
        lines.push(format!(
            "Today: {}/{} tasks done, {} penalty task(s) pending",
            self.tasks_completed_today, self.tasks_today, self.penalty_tasks
        ));
        lines.push(format!("Tasks completed overall: {}", self.total_tasks_completed));
        lines.join("\n")
    }
}

fn transition_message(transition: DayTransition) -> Option<String> {
    match transition {
        DayTransition::RolledOver {
            penalties_added,
            streak,
        } => {
            let streak = match streak {
                StreakUpdate::Incremented { streak, .. } => format!("streak is now {streak}"),
                StreakUpdate::Reset => "streak reset".to_string(),
                StreakUpdate::Unchanged => "streak unchanged".to_string(),
            };
            Some(format!(
                "New day: {penalties_added} penalty task(s) added, {streak}."
            ))
        }
        DayTransition::Rotated => Some("New tasks assigned.".to_string()),
        DayTransition::Unchanged => None,
    }
}

pub async fn execute(args: ProgressArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let account_id = ctx.require_account().await?;
    let engine = ctx.progression();

    let result = match args.command {
        ProgressCommands::Show => {
            let snapshot = engine.load_today(&account_id, today_utc()).await?;
            ProgressOutput {
                message: transition_message(snapshot.transition),
                ..ProgressOutput::from_snapshot(&snapshot)
            }
        }
        ProgressCommands::Reset => {
            let progress = engine.reset(&account_id, today_utc()).await?;
            ProgressOutput {
                message: Some("Progress reset.".to_string()),
                ..ProgressOutput::new(&progress, DayTransition::Unchanged)
            }
        }
        ProgressCommands::SetDate { date } => {
            let snapshot = engine.simulate_day(&account_id, &date).await?;
            ProgressOutput {
                message: Some(format!(
                    "Date set to {date}. {}",
                    transition_message(snapshot.transition).unwrap_or_default()
                )),
                ..ProgressOutput::from_snapshot(&snapshot)
            }
        }
    };

    output(&result, json_mode);
    Ok(())
}
