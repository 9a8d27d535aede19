//! Step sensor driven by explicit readings.
//!
//! Used by the `steps record` command and by tests in place of a device
//! pedometer.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::StepReading;
use crate::domain::ports::StepSensor;

#[derive(Debug, Default)]
struct SensorState {
    steps: u64,
    distance_m: f64,
    failing: bool,
}

#[derive(Debug, Default)]
pub struct ManualStepSensor {
    state: RwLock<SensorState>,
}

impl ManualStepSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor that starts at the given cumulative counts.
    pub fn with_reading(steps: u64, distance_m: f64) -> Self {
        Self {
            state: RwLock::new(SensorState {
                steps,
                distance_m,
                failing: false,
            }),
        }
    }

    pub async fn set(&self, steps: u64, distance_m: f64) {
        let mut state = self.state.write().await;
        state.steps = steps;
        state.distance_m = distance_m;
    }

    /// Make subsequent reads fail until switched back.
    pub async fn fail_reads(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }
}

#[async_trait]
impl StepSensor for ManualStepSensor {
    async fn read(&self) -> DomainResult<StepReading> {
        let state = self.state.read().await;
        if state.failing {
            return Err(DomainError::RemoteUnavailable(
                "step sensor unavailable".to_string(),
            ));
        }
        Ok(StepReading::new(state.steps, state.distance_m, Utc::now()))
    }
}
