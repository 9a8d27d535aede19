//! Per-account progress document.
//!
//! `UserProgress` is the single record the progression engine mutates. Its
//! serde shape is the persisted document format: camelCase field names, task
//! rewards stored as `xp`, and `lastStreakDate` defaulting to a sentinel date
//! that precedes any real one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::account::AccountId;
use super::level::{level_for_xp, xp_for_next_level, LevelInfo};
use super::screening::{CurrentTest, TestRecord};
use super::task::{AssignedTask, PenaltyTask, Task, TaskKind};

/// `lastStreakDate` value before the first streak day.
pub const STREAK_NOT_STARTED: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => panic!("sentinel date is valid"),
};

const fn streak_not_started() -> NaiveDate {
    STREAK_NOT_STARTED
}

/// Progress record for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub xp: u64,
    pub level: u64,
    pub next_level_xp: u64,
    pub total_tasks_completed: u64,

    pub streak: u32,
    #[serde(default = "streak_not_started")]
    pub last_streak_date: NaiveDate,

    pub last_task_date: Option<NaiveDate>,
    pub daily_tasks: Vec<Task>,
    pub completed_tasks: BTreeMap<String, bool>,
    pub penalty_tasks: Vec<PenaltyTask>,
    pub completed_penalty_tasks: BTreeMap<String, bool>,

    pub daily_steps: u64,
    pub daily_distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_step_update: Option<DateTime<Utc>>,

    pub mental_health_tests: BTreeMap<String, TestRecord>,
    pub current_test: Option<CurrentTest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,

    /// Fields written by other clients, preserved across rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            username: None,
            email: None,
            xp: 0,
            level: 1,
            next_level_xp: xp_for_next_level(0),
            total_tasks_completed: 0,
            streak: 0,
            last_streak_date: STREAK_NOT_STARTED,
            last_task_date: None,
            daily_tasks: Vec::new(),
            completed_tasks: BTreeMap::new(),
            penalty_tasks: Vec::new(),
            completed_penalty_tasks: BTreeMap::new(),
            daily_steps: 0,
            daily_distance: 0.0,
            last_step_update: None,
            mental_health_tests: BTreeMap::new(),
            current_test: None,
            created_at: None,
            last_login: None,
            extra: Map::new(),
        }
    }
}

impl UserProgress {
    /// Fresh record created alongside a new account.
    pub fn for_new_account(
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            created_at: Some(created_at),
            last_login: Some(created_at),
            ..Self::default()
        }
    }

    pub fn level_info(&self) -> LevelInfo {
        LevelInfo::from_xp(self.xp)
    }

    /// Re-derive `level` and `nextLevelXp` from `xp`.
    pub fn sync_level(&mut self) {
        self.level = level_for_xp(self.xp);
        self.next_level_xp = xp_for_next_level(self.xp);
    }

    /// Repair the document before a write: derived fields are recomputed and
    /// penalty tasks the legacy completed-map marks as done are dropped.
    pub fn normalize(&mut self) {
        self.sync_level();
        if !self.completed_penalty_tasks.is_empty() {
            let done = std::mem::take(&mut self.completed_penalty_tasks);
            self.penalty_tasks
                .retain(|task| !done.get(&task.id).copied().unwrap_or(false));
        }
    }

    pub fn is_task_completed(&self, task_id: &str) -> bool {
        self.completed_tasks.get(task_id).copied().unwrap_or(false)
    }

    /// Every daily task is completed (false when there are none).
    pub fn all_daily_completed(&self) -> bool {
        !self.daily_tasks.is_empty()
            && self
                .daily_tasks
                .iter()
                .all(|task| self.is_task_completed(&task.id))
    }

    pub fn completed_daily_count(&self) -> usize {
        self.daily_tasks
            .iter()
            .filter(|task| self.is_task_completed(&task.id))
            .count()
    }

    /// Look up a task by id in the ledger named by `kind`.
    pub fn find_task(&self, kind: TaskKind, id: &str) -> Option<AssignedTask> {
        match kind {
            TaskKind::Regular => self
                .daily_tasks
                .iter()
                .find(|task| task.id == id)
                .cloned()
                .map(AssignedTask::Regular),
            TaskKind::Penalty => self
                .penalty_tasks
                .iter()
                .find(|task| task.id == id)
                .cloned()
                .map(AssignedTask::Penalty),
        }
    }

    /// Today's tasks followed by outstanding penalty tasks.
    pub fn assignments(&self) -> Vec<AssignedTask> {
        self.daily_tasks
            .iter()
            .cloned()
            .map(AssignedTask::Regular)
            .chain(self.penalty_tasks.iter().cloned().map(AssignedTask::Penalty))
            .collect()
    }

    /// Name to show on the leaderboard.
    pub fn display_name(&self, account_id: &AccountId) -> String {
        self.username
            .clone()
            .or_else(|| self.extra.get("name").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| format!("user-{}", account_id.short()))
    }
}

/// A progress document together with its store metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProgress {
    pub account_id: AccountId,
    pub progress: UserProgress,
    /// Incremented by the store on every write.
    pub version: u64,
}
