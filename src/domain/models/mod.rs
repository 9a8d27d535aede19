pub mod account;
pub mod catalog;
pub mod config;
pub mod level;
pub mod progress;
pub mod screening;
pub mod steps;
pub mod task;

pub use account::{normalize_email, Account, AccountId};
pub use catalog::{default_catalog, enhance_title, DAILY_TASK_COUNT};
pub use config::{
    Config, DatabaseConfig, LlmConfig, LoggingConfig, ProgressionConfig, StepsConfig,
};
pub use level::{level_for_xp, level_progress, xp_for_next_level, LevelInfo};
pub use progress::{StoredProgress, UserProgress, STREAK_NOT_STARTED};
pub use screening::{answer_value, CurrentTest, ScoreEntry, ScreeningTest, TestRecord};
pub use steps::StepReading;
pub use task::{AssignedTask, PenaltyTask, Task, TaskKind, TaskRef};
