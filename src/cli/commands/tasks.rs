//! Daily task CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{AssignedTask, Config, TaskRef, UserProgress};
use crate::services::{today_utc, CompletionReport, DayTransition};

#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommands,
}

#[derive(Subcommand, Debug)]
pub enum TasksCommands {
    /// Show today's tasks and outstanding penalty tasks
    List,
    /// Mark a task as done
    Complete {
        /// Task ID
        id: String,
        /// The ID refers to a penalty task
        #[arg(long)]
        penalty: bool,
    },
    /// Mark a daily task as not done
    Undo {
        /// Task ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct TaskListOutput {
    pub date: String,
    pub transition: DayTransition,
    pub tasks: Vec<TaskStatusOutput>,
    pub completed: usize,
    pub total: usize,
    #[serde(skip)]
    progress: UserProgress,
}

#[derive(Debug, serde::Serialize)]
pub struct TaskStatusOutput {
    #[serde(flatten)]
    pub task: AssignedTask,
    pub completed: bool,
}

impl CommandOutput for TaskListOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let DayTransition::RolledOver {
            penalties_added, ..
        } = self.transition
        {
            if penalties_added > 0 {
                lines.push(
                    style(format!(
                        "{penalties_added} missed task(s) became penalty tasks worth double XP."
                    ))
                    .yellow()
                    .to_string(),
                );
            }
        }
        lines.push(format!(
            "Tasks for {} ({}/{} done)",
            self.date, self.completed, self.total
        ));
        lines.push(TableFormatter::new().format_tasks(&self.progress));
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CompletionOutput {
    #[serde(flatten)]
    pub report: CompletionReport,
}

impl CommandOutput for CompletionOutput {
    fn to_human(&self) -> String {
        let change = &self.report.change;
        let level = &self.report.level;
        if !change.applied {
            return format!("No change: '{}' is already in that state.", change.task.title());
        }
        let verb = if change.completed { "Completed" } else { "Undid" };
        let mut lines = vec![format!(
            "{verb} '{}' ({:+} XP)",
            change.task.title(),
            change.xp_delta()
        )];
        lines.push(format!(
            "Level {} · {} XP · {} XP to next level",
            level.level,
            change.xp_after,
            level.xp_remaining()
        ));
        if self.report.level_up {
            lines.push(
                style(format!("Level up! You reached level {}.", level.level))
                    .green()
                    .bold()
                    .to_string(),
            );
        }
        lines.join("\n")
    }
}

pub async fn execute(args: TasksArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let account_id = ctx.require_account().await?;
    let engine = ctx.progression();
    let today = today_utc();

    // Bring the day up to date before touching completions.
    let snapshot = engine.load_today(&account_id, today).await?;

    match args.command {
        TasksCommands::List => {
            let progress = snapshot.progress;
            let tasks = progress
                .assignments()
                .into_iter()
                .map(|task| TaskStatusOutput {
                    completed: matches!(task, AssignedTask::Regular(_))
                        && progress.is_task_completed(task.id()),
                    task,
                })
                .collect();
            let result = TaskListOutput {
                date: today.to_string(),
                transition: snapshot.transition,
                tasks,
                completed: progress.completed_daily_count(),
                total: progress.daily_tasks.len(),
                progress,
            };
            output(&result, json_mode);
        }
        TasksCommands::Complete { id, penalty } => {
            let task = if penalty {
                TaskRef::penalty(id)
            } else {
                TaskRef::regular(id)
            };
            let report = engine.set_completion(&account_id, &task, true).await?;
            output(&CompletionOutput { report }, json_mode);
        }
        TasksCommands::Undo { id } => {
            let report = engine
                .set_completion(&account_id, &TaskRef::regular(id), false)
                .await?;
            output(&CompletionOutput { report }, json_mode);
        }
    }
    Ok(())
}
