//! Device step/distance sensor port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::StepReading;

/// Source of cumulative step and distance counts for the current day.
#[async_trait]
pub trait StepSensor: Send + Sync {
    async fn read(&self) -> DomainResult<StepReading>;
}
