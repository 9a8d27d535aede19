//! UpliftXP - wellness progression engine
//!
//! Daily self-care tasks are rotated per calendar day, completions move XP
//! and levels, missed tasks come back as double-XP penalty tasks, and a
//! streak counts consecutive fully-completed days.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the ports to external services
//! - **Service Layer** (`services`): the progression engine and supporting use cases
//! - **Adapters** (`adapters`): SQLite document store and identity, HTTP text generation, sensors
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    level_for_xp, AccountId, Config, LevelInfo, PenaltyTask, Task, TaskRef, UserProgress,
};
pub use domain::ports::{IdentityProvider, ProgressStore, StepSensor, TextGenerator};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{LeaderboardService, ProgressionService, TaskRotation};
