//! Step tracking sessions.
//!
//! A [`TrackingSession`] polls a sensor for one account, publishes each new
//! reading on a watch channel and merges it into the progress document. The
//! poller stops on [`TrackingSession::stop`] or when the session is dropped.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AccountId, StepReading, StepsConfig, UserProgress};
use crate::domain::ports::{ProgressStore, StepSensor};

/// Steps and distance as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepSummary {
    pub steps: u64,
    pub distance_m: f64,
    pub goal_m: f64,
    /// Fraction of the distance goal reached, in `[0, 1]`.
    pub goal_ratio: f64,
}

impl StepSummary {
    pub fn from_progress(progress: &UserProgress, goal_m: f64) -> Self {
        let reading = StepReading {
            steps: progress.daily_steps,
            distance_m: progress.daily_distance,
            taken_at: progress.last_step_update,
        };
        Self {
            steps: reading.steps,
            distance_m: reading.distance_m,
            goal_m,
            goal_ratio: reading.goal_ratio(goal_m),
        }
    }
}

/// Merge a reading into the account's progress document.
pub async fn record_reading<P: ProgressStore + ?Sized>(
    store: &P,
    account_id: &AccountId,
    reading: &StepReading,
) -> DomainResult<()> {
    let taken_at = reading.taken_at.unwrap_or_else(Utc::now);
    let distance = serde_json::Number::from_f64(reading.distance_m).ok_or_else(|| {
        DomainError::ValidationFailed(format!("Invalid distance: {}", reading.distance_m))
    })?;

    let mut patch = Map::new();
    patch.insert("dailySteps".to_string(), Value::from(reading.steps));
    patch.insert("dailyDistance".to_string(), Value::Number(distance));
    patch.insert(
        "lastStepUpdate".to_string(),
        Value::String(taken_at.to_rfc3339()),
    );
    store.set_user_progress(account_id, patch, true).await
}

/// A running sensor poller for one account.
pub struct TrackingSession {
    account_id: AccountId,
    readings: watch::Receiver<StepReading>,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Start polling `sensor` every `config.poll_interval_ms`.
    pub fn start<S, P>(
        account_id: AccountId,
        sensor: Arc<S>,
        store: Arc<P>,
        config: &StepsConfig,
    ) -> Self
    where
        S: StepSensor + ?Sized + 'static,
        P: ProgressStore + ?Sized + 'static,
    {
        let (tx, readings) = watch::channel(StepReading::default());
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let interval = Duration::from_millis(config.poll_interval_ms.max(1));
        let id = account_id.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }

                let reading = match sensor.read().await {
                    Ok(reading) => reading,
                    Err(e) => {
                        warn!(account_id = %id, error = %e, "step sensor read failed");
                        continue;
                    }
                };
                let last = *tx.borrow();
                if reading.steps == last.steps
                    && (reading.distance_m - last.distance_m).abs() < f64::EPSILON
                {
                    continue;
                }

                tx.send_replace(reading);
                if let Err(e) = record_reading(store.as_ref(), &id, &reading).await {
                    warn!(account_id = %id, error = %e, "failed to save step reading");
                } else {
                    debug!(account_id = %id, steps = reading.steps, "step reading saved");
                }
            }
        });

        Self {
            account_id,
            readings,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Receiver that observes every published reading.
    pub fn subscribe(&self) -> watch::Receiver<StepReading> {
        self.readings.clone()
    }

    pub fn latest(&self) -> StepReading {
        *self.readings.borrow()
    }

    /// Stop polling and wait for the poller to finish.
    pub async fn stop(mut self) -> StepReading {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(account_id = %self.account_id, error = %e, "step poller ended abnormally");
            }
        }
        self.latest()
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
