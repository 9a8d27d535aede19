//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces the progression engine consumes:
//! - IdentityProvider: account registration and sessions
//! - ProgressStore: per-account progress documents
//! - TextGenerator: tips and advice
//! - StepSensor: step and distance counts

pub mod identity_provider;
pub mod progress_store;
pub mod step_sensor;
pub mod text_generator;

pub use identity_provider::IdentityProvider;
pub use progress_store::ProgressStore;
pub use step_sensor::StepSensor;
pub use text_generator::TextGenerator;
