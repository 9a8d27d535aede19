//! Completion ledger.
//!
//! Applies and reverses XP for task completions. Regular and penalty tasks go
//! through the same entry point and are dispatched on the task's kind.

use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssignedTask, PenaltyTask, Task, TaskRef, UserProgress};

/// What a completion request did to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerChange {
    pub task: AssignedTask,
    pub completed: bool,
    pub xp_before: u64,
    pub xp_after: u64,
    /// False when the request matched the current state and nothing changed.
    pub applied: bool,
}

impl LedgerChange {
    /// Signed XP difference.
    pub fn xp_delta(&self) -> i64 {
        let after = i64::try_from(self.xp_after).unwrap_or(i64::MAX);
        let before = i64::try_from(self.xp_before).unwrap_or(i64::MAX);
        after - before
    }
}

/// Mark a task completed or not completed.
///
/// Returns `TaskNotFound` when the id is not in today's tasks (regular) or the
/// penalty set (penalty); the record is untouched in that case.
pub fn set_completion(
    progress: &mut UserProgress,
    task: &TaskRef,
    completed: bool,
) -> DomainResult<LedgerChange> {
    let assigned = progress
        .find_task(task.kind, &task.id)
        .ok_or_else(|| DomainError::TaskNotFound(task.id.clone()))?;

    let change = match assigned {
        AssignedTask::Regular(regular) => toggle_regular(progress, regular, completed),
        AssignedTask::Penalty(penalty) => complete_penalty(progress, penalty, completed),
    };
    progress.sync_level();
    Ok(change)
}

fn toggle_regular(progress: &mut UserProgress, task: Task, completed: bool) -> LedgerChange {
    let xp_before = progress.xp;
    let applied = progress.is_task_completed(&task.id) != completed;

    if applied {
        let reward = u64::from(task.xp_reward);
        if completed {
            progress.xp = progress.xp.saturating_add(reward);
            progress.total_tasks_completed = progress.total_tasks_completed.saturating_add(1);
        } else {
            // Floored at zero even if the earlier grant was partly clamped.
            progress.xp = progress.xp.saturating_sub(reward);
            progress.total_tasks_completed = progress.total_tasks_completed.saturating_sub(1);
        }
        progress.completed_tasks.insert(task.id.clone(), completed);
    }

    LedgerChange {
        xp_after: progress.xp,
        task: AssignedTask::Regular(task),
        completed,
        xp_before,
        applied,
    }
}

fn complete_penalty(
    progress: &mut UserProgress,
    task: PenaltyTask,
    completed: bool,
) -> LedgerChange {
    let xp_before = progress.xp;
    // Penalty tasks cannot be un-completed: once done they are removed.
    if completed {
        progress.xp = progress.xp.saturating_add(u64::from(task.xp_reward));
        progress.penalty_tasks.retain(|p| p.id != task.id);
        progress.completed_penalty_tasks.remove(&task.id);
    }

    LedgerChange {
        xp_after: progress.xp,
        task: AssignedTask::Penalty(task),
        completed,
        xp_before,
        applied: completed,
    }
}
