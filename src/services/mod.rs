pub mod account_service;
pub mod advice_service;
pub mod document_update;
pub mod leaderboard_service;
pub mod ledger;
pub mod progression_service;
pub mod rollover;
pub mod rotation;
pub mod screening_service;
pub mod step_tracking;

pub use account_service::AccountService;
pub use advice_service::{AdviceService, DIET_TOPICS};
pub use document_update::{update_progress, Mutation, Updated};
pub use leaderboard_service::{LeaderboardEntry, LeaderboardService};
pub use ledger::LedgerChange;
pub use progression_service::{
    parse_override_date, today_utc, CompletionReport, DaySnapshot, DayTransition,
    ProgressionService,
};
pub use rollover::{Resolution, StreakPolicy, StreakUpdate};
pub use rotation::{Rotation, TaskRotation};
pub use screening_service::{AnswerOutcome, PendingQuestion, ScreeningService};
pub use step_tracking::{record_reading, StepSummary, TrackingSession};
