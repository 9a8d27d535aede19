//! Task domain model.
//!
//! A [`Task`] is an immutable catalog entry. A [`PenaltyTask`] is synthesized
//! from a daily task the user missed before rollover. Both are carried in a
//! single tagged [`AssignedTask`] so completion handling has one code path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog entry for a daily self-care action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Persisted as `xp`, the field name existing documents use.
    #[serde(rename = "xp", alias = "xpReward")]
    pub xp_reward: u32,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, xp_reward: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            xp_reward,
        }
    }
}

/// Harder, double-XP version of a missed daily task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyTask {
    pub id: String,
    pub title: String,
    #[serde(rename = "xp", alias = "xpReward")]
    pub xp_reward: u32,
    #[serde(default = "penalty_marker")]
    pub is_penalty: bool,
    pub original_task_id: String,
}

const fn penalty_marker() -> bool {
    true
}

/// A task as assigned to a user, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignedTask {
    Regular(Task),
    Penalty(PenaltyTask),
}

impl AssignedTask {
    pub fn id(&self) -> &str {
        match self {
            Self::Regular(task) => &task.id,
            Self::Penalty(task) => &task.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Regular(task) => &task.title,
            Self::Penalty(task) => &task.title,
        }
    }

    pub const fn xp_reward(&self) -> u32 {
        match self {
            Self::Regular(task) => task.xp_reward,
            Self::Penalty(task) => task.xp_reward,
        }
    }

    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Regular(_) => TaskKind::Regular,
            Self::Penalty(_) => TaskKind::Penalty,
        }
    }
}

/// Which ledger a task id lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Regular,
    Penalty,
}

impl TaskKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Penalty => "penalty",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a task the user interacted with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    pub id: String,
    pub kind: TaskKind,
}

impl TaskRef {
    pub fn regular(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TaskKind::Regular,
        }
    }

    pub fn penalty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TaskKind::Penalty,
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} task {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_reward_persists_as_xp() {
        let task = Task::new("water", "Drink 8 glasses of water", 20);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["xp"], 20);
        assert!(json.get("xpReward").is_none());
    }

    #[test]
    fn test_task_accepts_xp_reward_alias() {
        let task: Task =
            serde_json::from_str(r#"{"id":"walk","title":"Walk","xpReward":15}"#).unwrap();
        assert_eq!(task.xp_reward, 15);
    }

    #[test]
    fn test_penalty_wire_shape() {
        let json = r#"{"id":"penalty_water_1_abc","title":"Drink 12","xp":40,"isPenalty":true,"originalTaskId":"water"}"#;
        let penalty: PenaltyTask = serde_json::from_str(json).unwrap();
        assert_eq!(penalty.original_task_id, "water");
        assert_eq!(penalty.xp_reward, 40);
        assert!(penalty.is_penalty);
    }

    #[test]
    fn test_assigned_task_accessors() {
        let assigned = AssignedTask::Regular(Task::new("clean", "Clean your space", 20));
        assert_eq!(assigned.id(), "clean");
        assert_eq!(assigned.xp_reward(), 20);
        assert_eq!(assigned.kind(), TaskKind::Regular);
    }
}
