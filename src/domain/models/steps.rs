//! Step and distance readings supplied by device sensors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative counts for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepReading {
    pub steps: u64,
    /// Meters walked.
    pub distance_m: f64,
    pub taken_at: Option<DateTime<Utc>>,
}

impl StepReading {
    pub fn new(steps: u64, distance_m: f64, taken_at: DateTime<Utc>) -> Self {
        Self {
            steps,
            distance_m: distance_m.max(0.0),
            taken_at: Some(taken_at),
        }
    }

    /// Completed fraction of a distance goal, capped at 1.
    pub fn goal_ratio(&self, goal_m: f64) -> f64 {
        if goal_m <= 0.0 {
            return 1.0;
        }
        (self.distance_m / goal_m).clamp(0.0, 1.0)
    }
}
