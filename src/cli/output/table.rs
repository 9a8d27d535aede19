//! Table output formatting for CLI commands
//!
//! Renders task lists and the leaderboard with comfy-table. Colour is
//! dropped when `NO_COLOR` is set or the terminal is dumb.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{AccountId, AssignedTask, UserProgress};
use crate::services::LeaderboardEntry;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Today's tasks followed by outstanding penalty tasks.
    pub fn format_tasks(&self, progress: &UserProgress) -> String {
        let mut table = Self::create_base_table();
        table.set_header(vec![
            Cell::new("").add_attribute(Attribute::Bold),
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("XP").add_attribute(Attribute::Bold),
        ]);

        for task in progress.assignments() {
            let done = matches!(task, AssignedTask::Regular(_))
                && progress.is_task_completed(task.id());
            let marker = match (&task, done) {
                (AssignedTask::Penalty(_), _) => self.colored("!", Color::Red),
                (_, true) => self.colored("✓", Color::Green),
                (_, false) => Cell::new("·"),
            };
            let title = if done && self.use_colors {
                Cell::new(task.title()).fg(Color::DarkGrey)
            } else {
                Cell::new(task.title())
            };
            table.add_row(vec![
                marker,
                Cell::new(task.id()),
                title,
                Cell::new(format!("+{}", task.xp_reward())),
            ]);
        }

        table.to_string()
    }

    pub fn format_leaderboard(
        &self,
        entries: &[LeaderboardEntry],
        you: Option<&AccountId>,
    ) -> String {
        let mut table = Self::create_base_table();
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Level").add_attribute(Attribute::Bold),
            Cell::new("XP").add_attribute(Attribute::Bold),
            Cell::new("Streak").add_attribute(Attribute::Bold),
        ]);

        for entry in entries {
            let is_you = you == Some(&entry.account_id);
            let name = if is_you {
                self.colored(&format!("{} (you)", entry.name), Color::Cyan)
            } else {
                Cell::new(&entry.name)
            };
            let rank = match entry.rank {
                1 => self.colored("1", Color::Yellow),
                rank => Cell::new(rank),
            };
            table.add_row(vec![
                rank,
                name,
                Cell::new(entry.level),
                Cell::new(entry.xp),
                Cell::new(entry.streak),
            ]);
        }

        table.to_string()
    }

    fn colored(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn create_base_table() -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{PenaltyTask, Task};

    #[test]
    fn test_format_tasks_marks_state() {
        let mut progress = UserProgress {
            daily_tasks: vec![
                Task::new("water", "Drink water", 20),
                Task::new("walk", "Take a walk", 30),
            ],
            penalty_tasks: vec![PenaltyTask {
                id: "penalty_read_1_abc".to_string(),
                title: "Read for 45 minutes".to_string(),
                xp_reward: 50,
                is_penalty: true,
                original_task_id: "read".to_string(),
            }],
            ..UserProgress::default()
        };
        progress.completed_tasks.insert("water".to_string(), true);

        let rendered = TableFormatter::with_colors(false).format_tasks(&progress);
        assert!(rendered.contains("✓"));
        assert!(rendered.contains("Take a walk"));
        assert!(rendered.contains("penalty_read_1_abc"));
        assert!(rendered.contains("+50"));
    }

    #[test]
    fn test_format_leaderboard_marks_you() {
        let entries = vec![
            LeaderboardEntry {
                rank: 1,
                account_id: AccountId::new("a"),
                name: "ana".to_string(),
                xp: 2500,
                level: 3,
                streak: 4,
            },
            LeaderboardEntry {
                rank: 2,
                account_id: AccountId::new("b"),
                name: "ben".to_string(),
                xp: 100,
                level: 1,
                streak: 0,
            },
        ];
        let you = AccountId::new("b");
        let rendered = TableFormatter::with_colors(false).format_leaderboard(&entries, Some(&you));
        assert!(rendered.contains("ben (you)"));
        assert!(!rendered.contains("ana (you)"));
        assert!(rendered.contains("2500"));
    }
}
