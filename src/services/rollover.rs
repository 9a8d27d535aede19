//! Penalty and streak resolution at a day boundary.
//!
//! Runs once per day change, before rotation, against the tasks that were
//! live on the previous day.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;

use crate::domain::models::{enhance_title, PenaltyTask, Task, UserProgress};

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// How a missed day affects the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreakPolicy {
    /// Streak only ever grows.
    #[default]
    KeepOnMiss,
    /// Streak drops to 0 when a day was not fully completed or skipped.
    ResetOnMiss,
}

impl StreakPolicy {
    pub const fn from_reset_flag(reset_on_miss: bool) -> Self {
        if reset_on_miss {
            Self::ResetOnMiss
        } else {
            Self::KeepOnMiss
        }
    }
}

/// Change to the streak counter decided by a rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreakUpdate {
    Unchanged,
    Incremented { streak: u32, date: NaiveDate },
    Reset,
}

/// Result of resolving a day boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Previous penalty tasks followed by the newly generated ones.
    pub penalty_tasks: Vec<PenaltyTask>,
    pub generated: usize,
    pub streak_update: StreakUpdate,
}

impl Resolution {
    pub fn apply(self, progress: &mut UserProgress) {
        progress.penalty_tasks = self.penalty_tasks;
        match self.streak_update {
            StreakUpdate::Unchanged => {}
            StreakUpdate::Incremented { streak, date } => {
                progress.streak = streak;
                progress.last_streak_date = date;
            }
            StreakUpdate::Reset => progress.streak = 0,
        }
    }
}

/// Compute the penalty tasks and streak change for crossing into `today`.
pub fn resolve<R: Rng + ?Sized>(
    progress: &UserProgress,
    today: NaiveDate,
    policy: StreakPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Resolution {
    let missed: Vec<PenaltyTask> = progress
        .daily_tasks
        .iter()
        .filter(|task| !progress.is_task_completed(&task.id))
        .map(|task| penalty_for(task, now, rng))
        .collect();
    let generated = missed.len();

    let mut penalty_tasks = progress.penalty_tasks.clone();
    penalty_tasks.extend(missed);

    let all_completed = progress.all_daily_completed();
    let streak_update = if all_completed && progress.last_streak_date != today {
        StreakUpdate::Incremented {
            streak: progress.streak.saturating_add(1),
            date: today,
        }
    } else {
        StreakUpdate::Unchanged
    };

    let streak_update = match policy {
        StreakPolicy::ResetOnMiss
            if (!all_completed || skipped_days(progress, today)) && progress.streak > 0 =>
        {
            StreakUpdate::Reset
        }
        _ => streak_update,
    };

    Resolution {
        penalty_tasks,
        generated,
        streak_update,
    }
}

/// At least one whole calendar day passed without the app being opened.
fn skipped_days(progress: &UserProgress, today: NaiveDate) -> bool {
    progress
        .last_task_date
        .is_some_and(|last| (today - last).num_days() > 1)
}

/// Harder, double-XP copy of a missed task.
pub fn penalty_for<R: Rng + ?Sized>(task: &Task, now: DateTime<Utc>, rng: &mut R) -> PenaltyTask {
    PenaltyTask {
        id: penalty_id(&task.id, now, rng),
        title: enhance_title(&task.title),
        xp_reward: task.xp_reward.saturating_mul(2),
        is_penalty: true,
        original_task_id: task.id.clone(),
    }
}

/// `penalty_{original}_{unix millis}_{9 base36 chars}`.
pub fn penalty_id<R: Rng + ?Sized>(original_id: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("penalty_{original_id}_{}_{suffix}", now.timestamp_millis())
}
